//! # PNG Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per diverse operazioni
//! - `file_manager`: Scansione ricorsiva e directory mirror
//! - `image_processor`: Conversione in PNG ottimizzato
//! - `optimizer`: Coda, pool di worker e orchestratore
//! - `progress`: Report per file, progress bar e statistiche
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use png_optimizer::{Config, MediaOptimizer};
//!
//! let config = Config::default();
//! let summary = MediaOptimizer::new(config)?.run().await?;
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod optimizer;
pub mod progress;

pub use config::Config;
pub use error::OptimizeError;
pub use image_processor::{ImageCodec, ImageProcessor, PngOptions};
pub use optimizer::{ConversionResult, MediaOptimizer, RunSummary};
