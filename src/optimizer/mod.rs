//! # Optimizer Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `media_optimizer`: Orchestratore principale
//! - `dispatcher`: Coordinatore di coda, worker e contatori
//! - `worker_pool`: Pool di worker a dimensione fissa
//! - `task_optimizer`: Conversione di un singolo file
//! - `task_queue`: Coda FIFO dei task
//! - `run_state`: Contatori del run
//! - `path_resolver`: Logica di calcolo path centralizzata

pub mod dispatcher;
pub mod media_optimizer;
pub mod path_resolver;
pub mod run_state;
pub mod task_optimizer;
pub mod task_queue;
pub mod worker_pool;

pub use dispatcher::Dispatcher;
pub use media_optimizer::{MediaOptimizer, RunSummary};
pub use path_resolver::PathResolver;
pub use run_state::RunState;
pub use task_optimizer::{ConversionOutcome, ConversionResult, SizeMetrics, TaskOptimizer};
pub use task_queue::{Task, TaskQueue};
pub use worker_pool::{WorkerEvent, WorkerPool, WorkerSlot};
