//! # Task Optimizer Module
//!
//! Worker per l'ottimizzazione di singoli file.
//! Misura le dimensioni prima e dopo, delega la conversione al codec e
//! produce esattamente un `ConversionResult` per task.

use crate::{
    file_manager::FileManager,
    image_processor::{ImageCodec, PngOptions},
    optimizer::task_queue::Task,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Size measurements of a conversion; every field may be unavailable
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeMetrics {
    pub original_bytes: Option<u64>,
    pub optimized_bytes: Option<u64>,
    pub savings_percentage: Option<f64>,
}

impl SizeMetrics {
    pub fn new(original_bytes: Option<u64>, optimized_bytes: Option<u64>) -> Self {
        Self {
            original_bytes,
            optimized_bytes,
            savings_percentage: FileManager::calculate_savings(original_bytes, optimized_bytes),
        }
    }
}

/// Esito della conversione di un task
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Completed {
        output_path: PathBuf,
        metrics: SizeMetrics,
    },
    Failed {
        error: String,
    },
}

/// Result reported by a worker for exactly one task
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub input_path: PathBuf,
    pub outcome: ConversionOutcome,
}

impl ConversionResult {
    pub fn completed(task: &Task, metrics: SizeMetrics) -> Self {
        Self {
            input_path: task.input_path.clone(),
            outcome: ConversionOutcome::Completed {
                output_path: task.output_path.clone(),
                metrics,
            },
        }
    }

    pub fn failed(input_path: PathBuf, error: impl ToString) -> Self {
        Self {
            input_path,
            outcome: ConversionOutcome::Failed {
                error: error.to_string(),
            },
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, ConversionOutcome::Completed { .. })
    }
}

/// Worker ottimizzato per elaborazione singoli file
pub struct TaskOptimizer<C: ImageCodec> {
    codec: Arc<C>,
    options: PngOptions,
}

impl<C: ImageCodec> TaskOptimizer<C> {
    /// Crea nuovo task optimizer
    pub fn new(codec: Arc<C>, options: PngOptions) -> Self {
        Self { codec, options }
    }

    /// Processa un singolo file (bloccante: I/O e CPU del codec)
    pub fn process(&self, task: &Task) -> ConversionResult {
        debug!("Processing: {} -> {}", task.input_path.display(), task.output_path.display());

        let original_bytes = FileManager::file_size(&task.input_path);

        if let Err(e) = self
            .codec
            .encode_as_optimized_png(&task.input_path, &task.output_path, &self.options)
        {
            return ConversionResult::failed(task.input_path.clone(), e);
        }

        let optimized_bytes = FileManager::file_size(&task.output_path);
        ConversionResult::completed(task, SizeMetrics::new(original_bytes, optimized_bytes))
    }
}
