//! # Task Queue Module
//!
//! Coda FIFO dei task di conversione, popolata dalla scansione prima
//! dell'avvio dei worker e consumata solo dal dispatcher.

use std::collections::VecDeque;
use std::path::PathBuf;

/// A single input -> output conversion unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Task {
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
        }
    }
}

/// Ordered queue of pending tasks
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to the tail
    pub fn enqueue(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    /// Remove the head task, handing ownership to the caller
    pub fn next_task(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    /// Put back a task that could not be delivered to its worker
    pub fn requeue_front(&mut self, task: Task) {
        self.tasks.push_front(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Svuota la coda restituendo i task rimasti
    pub fn drain(&mut self) -> impl Iterator<Item = Task> + '_ {
        self.tasks.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str) -> Task {
        Task::new(PathBuf::from(format!("in/{name}.jpg")), PathBuf::from(format!("out/{name}.png")))
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = TaskQueue::new();
        queue.enqueue(task("a"));
        queue.enqueue(task("b"));
        queue.enqueue(task("c"));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.next_task(), Some(task("a")));
        assert_eq!(queue.next_task(), Some(task("b")));
        assert_eq!(queue.next_task(), Some(task("c")));
        assert_eq!(queue.next_task(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_no_deduplication() {
        let mut queue = TaskQueue::new();
        queue.enqueue(task("a"));
        queue.enqueue(task("a"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_requeue_front_restores_head() {
        let mut queue = TaskQueue::new();
        queue.enqueue(task("a"));
        queue.enqueue(task("b"));

        let head = queue.next_task().unwrap();
        queue.requeue_front(head);
        assert_eq!(queue.next_task(), Some(task("a")));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = TaskQueue::new();
        queue.enqueue(task("a"));
        queue.enqueue(task("b"));
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec![task("a"), task("b")]);
        assert!(queue.is_empty());
    }
}
