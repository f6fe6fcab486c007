//! Task record: queue metadata + envelope.

use std::time::Instant;

use serde::Serialize;

use super::TaskState;
use crate::domain::{Hook, TaskEnvelope, TaskId};

/// Single source of truth for a queued job. The ready/scheduled structures
/// only hold ids; every state transition happens here.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub envelope: TaskEnvelope,
    pub state: TaskState,

    /// Executions so far, including the current one while Running.
    pub attempts: u32,

    pub max_attempts: u32,

    pub last_error: Option<String>,

    /// Set while RetryScheduled.
    pub next_run_at: Option<Instant>,

    pub created_at: Instant,
    pub updated_at: Instant,
}

impl TaskRecord {
    pub fn new(envelope: TaskEnvelope, max_attempts: u32) -> Self {
        let now = Instant::now();
        Self {
            envelope,
            state: TaskState::Queued,
            attempts: 0,
            max_attempts,
            last_error: None,
            next_run_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn start_attempt(&mut self) {
        self.state = TaskState::Running;
        self.attempts += 1;
        self.updated_at = Instant::now();
    }

    pub fn mark_succeeded(&mut self) {
        self.state = TaskState::Succeeded;
        self.updated_at = Instant::now();
    }

    pub fn mark_dead(&mut self, error: String) {
        self.state = TaskState::Dead;
        self.last_error = Some(error);
        self.updated_at = Instant::now();
    }

    pub fn schedule_retry(&mut self, next_run_at: Instant, error: String) {
        self.state = TaskState::RetryScheduled;
        self.next_run_at = Some(next_run_at);
        self.last_error = Some(error);
        self.updated_at = Instant::now();
    }

    /// RetryScheduled -> Queued.
    pub fn requeue(&mut self) {
        self.state = TaskState::Queued;
        self.next_run_at = None;
        self.updated_at = Instant::now();
    }

    pub fn has_attempts_left(&self) -> bool {
        self.attempts < self.max_attempts
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus {
            task_id: self.envelope.task_id(),
            hook: self.envelope.hook().clone(),
            state: self.state,
            attempts: self.attempts,
            last_error: self.last_error.clone(),
        }
    }
}

/// Read-only snapshot of a task for status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub hook: Hook,
    pub state: TaskState,
    pub attempts: u32,
    pub last_error: Option<String>,
}
