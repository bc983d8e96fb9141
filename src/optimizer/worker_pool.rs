//! # Worker Pool Module
//!
//! Pool di worker a dimensione fissa. Ogni worker è un task tokio con il
//! proprio canale di input (capacità 1: un solo task alla volta) e un canale
//! di eventi condiviso verso il coordinatore. La conversione gira su
//! `spawn_blocking`, quindi il lavoro CPU non blocca né il coordinatore né
//! gli altri worker.
//!
//! ## Protocollo:
//! - coordinatore -> worker: `Task`
//! - worker -> coordinatore: `WorkerEvent::Finished` (un risultato per task)
//! - worker -> coordinatore: `WorkerEvent::Exited` quando il worker termina
//! - shutdown: il coordinatore chiude i canali di input, ogni worker finisce
//!   il task corrente ed esce

use crate::{
    error::OptimizeError,
    image_processor::ImageCodec,
    optimizer::{
        task_optimizer::{ConversionResult, TaskOptimizer},
        task_queue::Task,
    },
};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Message sent by a worker to the coordinator
#[derive(Debug)]
pub enum WorkerEvent {
    /// The worker finished its task and is free again
    Finished {
        worker_id: usize,
        result: ConversionResult,
    },
    /// The worker loop ended
    Exited { worker_id: usize },
}

/// Coordinator-side view of one worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerSlot {
    Idle,
    Busy(PathBuf),
    Gone,
}

impl WorkerSlot {
    pub fn is_idle(&self) -> bool {
        matches!(self, WorkerSlot::Idle)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, WorkerSlot::Busy(_))
    }
}

struct WorkerHandle {
    id: usize,
    tasks: mpsc::Sender<Task>,
    join: JoinHandle<()>,
}

/// Fixed-size set of conversion workers
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
}

impl WorkerPool {
    /// Spawn `size` workers sharing `optimizer`; each reports on `events`
    pub fn spawn<C: ImageCodec>(
        size: usize,
        optimizer: Arc<TaskOptimizer<C>>,
        events: mpsc::UnboundedSender<WorkerEvent>,
    ) -> Self {
        let workers = (0..size)
            .map(|id| {
                let (tasks, receiver) = mpsc::channel(1);
                let join = tokio::spawn(worker_loop(id, receiver, optimizer.clone(), events.clone()));
                WorkerHandle { id, tasks, join }
            })
            .collect();

        Self { workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Hand `task` to worker `worker_id`; gives the task back if that worker is gone
    pub async fn dispatch(&self, worker_id: usize, task: Task) -> Result<(), Task> {
        match self.workers.get(worker_id) {
            Some(worker) => worker.tasks.send(task).await.map_err(|e| e.0),
            None => Err(task),
        }
    }

    /// Close every task channel and wait for the workers to finish
    pub async fn shutdown(self) {
        let mut ids = Vec::with_capacity(self.workers.len());
        let mut joins = Vec::with_capacity(self.workers.len());
        for WorkerHandle { id, tasks, join } in self.workers {
            drop(tasks);
            ids.push(id);
            joins.push(join);
        }

        for (id, joined) in ids.into_iter().zip(join_all(joins).await) {
            if let Err(e) = joined {
                error!("Worker {} terminated abnormally: {}", id, e);
            }
        }
        debug!("Worker pool shut down");
    }
}

/// Reports `Exited` however the worker loop ends
struct ExitGuard {
    worker_id: usize,
    events: mpsc::UnboundedSender<WorkerEvent>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let _ = self.events.send(WorkerEvent::Exited {
            worker_id: self.worker_id,
        });
    }
}

async fn worker_loop<C: ImageCodec>(
    worker_id: usize,
    mut tasks: mpsc::Receiver<Task>,
    optimizer: Arc<TaskOptimizer<C>>,
    events: mpsc::UnboundedSender<WorkerEvent>,
) {
    let _guard = ExitGuard {
        worker_id,
        events: events.clone(),
    };
    debug!("Worker {} started", worker_id);

    while let Some(task) = tasks.recv().await {
        let input_path = task.input_path.clone();
        let worker_optimizer = optimizer.clone();

        let result = match tokio::task::spawn_blocking(move || worker_optimizer.process(&task)).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Worker {} crashed while converting {}", worker_id, input_path.display());
                let crash = OptimizeError::WorkerCrashed {
                    worker_id,
                    reason: e.to_string(),
                };
                ConversionResult::failed(input_path, crash)
            }
        };

        if events.send(WorkerEvent::Finished { worker_id, result }).is_err() {
            warn!("Worker {} lost its coordinator", worker_id);
            break;
        }
    }

    debug!("Worker {} stopped", worker_id);
}
