//! # Dispatcher Module
//!
//! Il coordinatore del pool: possiede la coda, lo stato dei worker e i
//! contatori del run. Tutto lo stato viene modificato solo dentro il loop di
//! ricezione, un evento alla volta.
//!
//! ## Garanzie:
//! - Ogni task viene consegnato a un solo worker
//! - Nessun task viene perso: ognuno produce esattamente un risultato
//! - Il run termina quando `files_processed == files_to_process`
//!
//! ## Fallimenti dei worker:
//! - Task non consegnato (worker già terminato): torna in testa alla coda
//! - Worker terminato durante un task: il task viene registrato come fallito
//! - Nessun worker rimasto: i task in coda vengono registrati come falliti

use crate::{
    error::OptimizeError,
    optimizer::{
        run_state::RunState,
        task_optimizer::ConversionResult,
        task_queue::TaskQueue,
        worker_pool::{WorkerEvent, WorkerPool, WorkerSlot},
    },
    progress::Reporter,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Outcome of draining the queue through the pool
#[derive(Debug)]
pub struct DispatchOutcome {
    pub state: RunState,
    pub results: Vec<ConversionResult>,
}

/// Coordinator state: queue, worker slots and run counters
pub struct Dispatcher {
    queue: TaskQueue,
    pool: WorkerPool,
    slots: Vec<WorkerSlot>,
    state: RunState,
    reporter: Reporter,
    results: Vec<ConversionResult>,
}

impl Dispatcher {
    pub fn new(queue: TaskQueue, pool: WorkerPool, reporter: Reporter) -> Self {
        let state = RunState::new(queue.len());
        let slots = vec![WorkerSlot::Idle; pool.size()];
        Self {
            queue,
            pool,
            slots,
            state,
            reporter,
            results: Vec::new(),
        }
    }

    /// Seed every worker, then handle events until every task is accounted for
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<WorkerEvent>) -> (DispatchOutcome, Reporter) {
        for worker_id in 0..self.slots.len() {
            if self.queue.is_empty() {
                break;
            }
            // Uno slot può essere già occupato da un task dirottato da un worker morto
            if !self.slots[worker_id].is_idle() {
                continue;
            }
            self.assign_next(worker_id).await;
        }
        self.fail_stranded_tasks();

        while !self.state.is_complete() {
            match events.recv().await {
                Some(event) => self.handle_event(event).await,
                None => {
                    error!("All workers exited with {} tasks outstanding", self.state.remaining());
                    self.fail_outstanding_tasks();
                    break;
                }
            }
        }

        info!("All {} tasks accounted for, shutting down workers", self.state.files_to_process());
        let Dispatcher {
            pool,
            state,
            reporter,
            results,
            ..
        } = self;
        pool.shutdown().await;

        (DispatchOutcome { state, results }, reporter)
    }

    /// Bind the queue head to `worker_id`, moving on to another idle worker if it is gone
    async fn assign_next(&mut self, mut worker_id: usize) {
        loop {
            let Some(task) = self.queue.next_task() else {
                self.slots[worker_id] = WorkerSlot::Idle;
                return;
            };

            let input_path = task.input_path.clone();
            debug!("Assigning task for {} to worker {}", input_path.display(), worker_id);
            match self.pool.dispatch(worker_id, task).await {
                Ok(()) => {
                    self.slots[worker_id] = WorkerSlot::Busy(input_path);
                    return;
                }
                Err(task) => {
                    warn!("Worker {} is no longer running, returning task to the queue", worker_id);
                    self.slots[worker_id] = WorkerSlot::Gone;
                    self.queue.requeue_front(task);
                    match self.slots.iter().position(WorkerSlot::is_idle) {
                        Some(next) => worker_id = next,
                        None => return,
                    }
                }
            }
        }
    }

    async fn handle_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Finished { worker_id, result } => {
                self.record(result);
                if self.slots[worker_id].is_busy() {
                    self.slots[worker_id] = WorkerSlot::Idle;
                }
                if !self.queue.is_empty() {
                    self.assign_next(worker_id).await;
                }
            }
            WorkerEvent::Exited { worker_id } => {
                let previous = std::mem::replace(&mut self.slots[worker_id], WorkerSlot::Gone);
                error!("Worker {} exited unexpectedly", worker_id);
                if let WorkerSlot::Busy(input_path) = previous {
                    let crash = OptimizeError::WorkerCrashed {
                        worker_id,
                        reason: "exited before reporting a result".to_string(),
                    };
                    self.record(ConversionResult::failed(input_path, crash));
                }
            }
        }
        self.fail_stranded_tasks();
    }

    fn record(&mut self, result: ConversionResult) {
        self.reporter.report(&result);
        self.state.record_processed();
        self.results.push(result);
    }

    /// Queued tasks nobody will ever pick up: every worker is gone
    fn fail_stranded_tasks(&mut self) {
        if self.queue.is_empty() || self.slots.iter().any(|slot| !matches!(slot, WorkerSlot::Gone)) {
            return;
        }
        let stranded: Vec<_> = self.queue.drain().collect();
        for task in stranded {
            let reason = OptimizeError::WorkerUnavailable("every worker has exited".to_string());
            self.record(ConversionResult::failed(task.input_path, reason));
        }
    }

    /// Event channel closed: fail everything still in flight or queued
    fn fail_outstanding_tasks(&mut self) {
        for worker_id in 0..self.slots.len() {
            let previous = std::mem::replace(&mut self.slots[worker_id], WorkerSlot::Gone);
            if let WorkerSlot::Busy(input_path) = previous {
                let crash = OptimizeError::WorkerCrashed {
                    worker_id,
                    reason: "event channel closed".to_string(),
                };
                self.record(ConversionResult::failed(input_path, crash));
            }
        }
        self.fail_stranded_tasks();
    }
}
