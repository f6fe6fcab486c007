//! Task state machine for the queue.

use serde::{Deserialize, Serialize};

/// State transitions:
/// - Queued -> Running -> Succeeded
/// - Queued -> Running -> RetryScheduled -> Queued (bounded by max_attempts)
/// - Queued -> Running -> Dead (max_attempts reached)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    /// Ready to run immediately.
    Queued,

    /// Leased by a worker.
    Running,

    Succeeded,

    /// Waiting out a backoff delay.
    RetryScheduled,

    /// Failed with no attempts left.
    Dead,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Dead)
    }

    pub fn is_runnable(self) -> bool {
        matches!(self, TaskState::Queued)
    }
}
