//! # PNG Optimizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Inizializzazione del sistema di logging con `tracing` (`RUST_LOG`, default `info`)
//! - Caricamento della configurazione da `png-optimizer.json` (se presente)
//! - Avvio dell'optimizer
//!
//! Il programma non accetta argomenti. Gli errori di scansione o di
//! configurazione vengono stampati su stderr con exit code diverso da zero.

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use png_optimizer::{config::CONFIG_FILE, Config, MediaOptimizer};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_file(Path::new(CONFIG_FILE)).await?;

    let optimizer = MediaOptimizer::new(config)?;
    optimizer.run().await?;

    Ok(())
}
