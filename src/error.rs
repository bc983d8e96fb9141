//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `Image`: Errori di decodifica immagini (formati corrotti, etc.)
//! - `Encoding`: Errori di scrittura del PNG ottimizzato
//! - `Traversal`: Directory di input non leggibile durante la scansione
//! - `CreateDir`: Directory di output mirror non creabile
//! - `Validation`: Errori di validazione della configurazione
//! - `WorkerCrashed` / `WorkerUnavailable`: Errori dell'infrastruttura worker
//!
//! ## Fatalità:
//! - `Traversal` e `CreateDir` interrompono la scansione (nessun worker avviato)
//! - Tutti gli altri vengono registrati come risultato `Failed` del singolo file
//!
//! ## Esempio:
//! ```rust,ignore
//! if config.workers == Some(0) {
//!     return Err(OptimizeError::Validation("Number of workers must be greater than 0".to_string()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for PNG optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Directory traversal error: {0}")]
    Traversal(#[from] walkdir::Error),

    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Worker {worker_id} crashed: {reason}")]
    WorkerCrashed { worker_id: usize, reason: String },

    #[error("No worker available: {0}")]
    WorkerUnavailable(String),
}
