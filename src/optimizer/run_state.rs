//! # Run State Module
//!
//! Contatori del run posseduti dal solo coordinatore: nessun `Arc<Mutex<_>>`,
//! gli eventi dei worker vengono applicati uno alla volta.

/// Totals of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    files_to_process: usize,
    files_processed: usize,
}

impl RunState {
    /// `files_to_process` is frozen here, after traversal has finished
    pub fn new(files_to_process: usize) -> Self {
        Self {
            files_to_process,
            files_processed: 0,
        }
    }

    pub fn files_to_process(&self) -> usize {
        self.files_to_process
    }

    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    /// Count one accounted-for task, success or failure
    pub fn record_processed(&mut self) {
        debug_assert!(self.files_processed < self.files_to_process);
        self.files_processed += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.files_processed == self.files_to_process
    }

    pub fn remaining(&self) -> usize {
        self.files_to_process - self.files_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run_is_complete_immediately() {
        let state = RunState::new(0);
        assert!(state.is_complete());
        assert_eq!(state.remaining(), 0);
    }

    #[test]
    fn test_completion_only_when_totals_match() {
        let mut state = RunState::new(2);
        assert!(!state.is_complete());

        state.record_processed();
        assert!(!state.is_complete());
        assert_eq!(state.remaining(), 1);

        state.record_processed();
        assert!(state.is_complete());
        assert_eq!(state.files_processed(), state.files_to_process());
    }
}
