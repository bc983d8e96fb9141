//! # Media Optimizer Main Orchestrator
//!
//! Orchestratore principale: scansione completa dell'input, avvio del pool,
//! dispatch fino al completamento e report finale. Se la scansione fallisce
//! nessun worker viene avviato.

use crate::{
    config::Config,
    file_manager::FileManager,
    image_processor::{ImageCodec, ImageProcessor, PngOptions},
    optimizer::{
        dispatcher::Dispatcher,
        task_optimizer::{ConversionResult, TaskOptimizer},
        worker_pool::WorkerPool,
    },
    progress::{OptimizationStats, Reporter},
};
use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::info;

/// Everything a run produced
#[derive(Debug)]
pub struct RunSummary {
    pub files_to_process: usize,
    pub files_processed: usize,
    pub stats: OptimizationStats,
    /// One entry per task, in completion order
    pub results: Vec<ConversionResult>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.files_processed == self.files_to_process
    }
}

/// Orchestratore principale
pub struct MediaOptimizer<C: ImageCodec = ImageProcessor> {
    config: Config,
    codec: Arc<C>,
}

impl MediaOptimizer<ImageProcessor> {
    /// Crea nuova istanza dell'ottimizzatore con il codec di default
    pub fn new(config: Config) -> Result<Self> {
        Self::with_codec(config, ImageProcessor::new())
    }
}

impl<C: ImageCodec> MediaOptimizer<C> {
    /// Crea un ottimizzatore con un codec specifico
    pub fn with_codec(config: Config, codec: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            codec: Arc::new(codec),
        })
    }

    /// Esegue il processo di ottimizzazione
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        info!("Starting recursive image optimization and conversion to PNG...");
        info!("Input directory: {}", self.config.input_dir.display());
        info!("Output directory: {}", self.config.output_dir.display());

        let queue = FileManager::collect_tasks(&self.config.input_dir, &self.config.output_dir)?;
        let files_to_process = queue.len();

        if files_to_process == 0 {
            info!("No images found to process.");
            return Ok(RunSummary {
                files_to_process: 0,
                files_processed: 0,
                stats: OptimizationStats::new(),
                results: Vec::new(),
                duration: start_time.elapsed(),
            });
        }

        info!("Found {} images to process", files_to_process);

        let worker_count = self.config.worker_count();
        let optimizer = Arc::new(TaskOptimizer::new(self.codec.clone(), PngOptions::default()));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let pool = WorkerPool::spawn(worker_count, optimizer, events_tx);
        info!("Initialized {} workers.", worker_count);

        let reporter = Reporter::new(files_to_process, self.config.show_progress);
        let (outcome, reporter) = Dispatcher::new(queue, pool, reporter).run(events_rx).await;

        let duration = start_time.elapsed();
        let stats = reporter.finish(duration);
        info!("Recursive image optimization and conversion to PNG completed.");

        Ok(RunSummary {
            files_to_process: outcome.state.files_to_process(),
            files_processed: outcome.state.files_processed(),
            stats,
            results: outcome.results,
            duration,
        })
    }
}
