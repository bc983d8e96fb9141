//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il reporting per file, il progress tracking e le statistiche.
//!
//! ## Responsabilità:
//! - Una riga di log per ogni `ConversionResult` (convertito o errore)
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking statistiche cumulative (convertiti, errori, byte risparmiati)
//! - Report finale con statistiche aggregate
//!
//! ## Componenti principali:
//! - `Reporter`: Trasforma i risultati in output console
//! - `ProgressManager`: Gestisce la progress bar principale
//! - `OptimizationStats`: Traccia statistiche cumulative
//!
//! ## Formato righe:
//! ```text
//! Converted/Optimized: in/a.jpg -> out/a.png | Original: 120.50KB | Output: 80.25KB | Saved: 33.40%
//! Error processing in/b.jpg: Image processing error: ...
//! ```
//! Le metriche mancanti vengono mostrate come `N/A`.

use crate::file_manager::FileManager;
use crate::optimizer::task_optimizer::{ConversionOutcome, ConversionResult, SizeMetrics};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{error, info};

/// Manages progress reporting for PNG optimization
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for optimization results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OptimizationStats {
    pub files_processed: usize,
    pub files_converted: usize,
    pub errors: usize,
    pub total_original_size: u64,
    pub total_optimized_size: u64,
}

impl OptimizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_converted(&mut self, metrics: &SizeMetrics) {
        self.files_processed += 1;
        self.files_converted += 1;
        // Solo le coppie complete contano per il totale risparmiato
        if let (Some(original), Some(optimized)) = (metrics.original_bytes, metrics.optimized_bytes) {
            self.total_original_size += original;
            self.total_optimized_size += optimized;
        }
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    pub fn total_bytes_saved(&self) -> i64 {
        self.total_original_size as i64 - self.total_optimized_size as i64
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_savings(Some(self.total_original_size), Some(self.total_optimized_size))
            .unwrap_or(0.0)
    }

    pub fn format_summary(&self) -> String {
        let saved = self.total_bytes_saved();
        let saved_text = if saved >= 0 {
            FileManager::format_size(saved as u64)
        } else {
            format!("-{}", FileManager::format_size(saved.unsigned_abs()))
        };
        format!(
            "Processed: {} files | Converted: {} | Errors: {} | Total saved: {} ({:.2}%)",
            self.files_processed,
            self.files_converted,
            self.errors,
            saved_text,
            self.overall_reduction_percent()
        )
    }
}

/// Turns conversion results into console output
pub struct Reporter {
    progress: Option<ProgressManager>,
    stats: OptimizationStats,
}

impl Reporter {
    pub fn new(total_files: usize, show_progress: bool) -> Self {
        Self {
            progress: show_progress.then(|| ProgressManager::new(total_files as u64)),
            stats: OptimizationStats::new(),
        }
    }

    /// Log one result and fold it into the statistics
    pub fn report(&mut self, result: &ConversionResult) {
        let line = Self::format_result(result);
        match &result.outcome {
            ConversionOutcome::Completed { metrics, .. } => {
                info!("{}", line);
                self.stats.add_converted(metrics);
            }
            ConversionOutcome::Failed { .. } => {
                error!("{}", line);
                self.stats.add_error();
            }
        }

        if let Some(progress) = &self.progress {
            let name = result
                .input_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy();
            let status = if result.is_completed() { "[OK]" } else { "[ERROR]" };
            progress.update(&format!("{} {}", status, name));
        }
    }

    /// Human-readable line for a result
    pub fn format_result(result: &ConversionResult) -> String {
        match &result.outcome {
            ConversionOutcome::Completed { output_path, metrics } => format!(
                "Converted/Optimized: {} -> {} | Original: {}KB | Output: {}KB | Saved: {}%",
                result.input_path.display(),
                output_path.display(),
                FileManager::format_kb(metrics.original_bytes),
                FileManager::format_kb(metrics.optimized_bytes),
                metrics
                    .savings_percentage
                    .map(|p| format!("{:.2}", p))
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            ConversionOutcome::Failed { error } => {
                format!("Error processing {}: {}", result.input_path.display(), error)
            }
        }
    }

    /// Chiude la progress bar e stampa il riepilogo finale
    pub fn finish(self, duration: Duration) -> OptimizationStats {
        let summary = self.stats.format_summary();
        if let Some(progress) = &self.progress {
            progress.finish(&summary);
        }

        info!("=== Optimization Complete ===");
        info!("Files processed: {}", self.stats.files_processed);
        info!("Files converted: {}", self.stats.files_converted);
        info!("Errors: {}", self.stats.errors);
        info!("{}", summary);
        info!("Elapsed: {:.2}s", duration.as_secs_f64());

        self.stats
    }
}
