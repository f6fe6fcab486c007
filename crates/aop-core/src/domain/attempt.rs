//! Execution history kept by the queue: one record per attempt and one per
//! retry decision.

use std::time::Instant;

use serde::Serialize;

use super::ids::{AttemptId, TaskId};
use super::task::Hook;

#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub attempt_id: AttemptId,
    pub task_id: TaskId,
    pub hook: Hook,

    /// 1-based attempt number for this task.
    pub number: u32,

    /// `None` when the attempt succeeded.
    pub error: Option<String>,

    #[serde(skip)]
    pub recorded_at: Instant,
}

impl AttemptRecord {
    pub fn new(
        attempt_id: AttemptId,
        task_id: TaskId,
        hook: Hook,
        number: u32,
        error: Option<String>,
    ) -> Self {
        Self {
            attempt_id,
            task_id,
            hook,
            number,
            error,
            recorded_at: Instant::now(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Why the queue did what it did after a failed attempt.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub task_id: TaskId,

    /// What was observed (error, attempt counts).
    pub trigger: serde_json::Value,

    /// e.g. "retry_policy"
    pub policy: String,

    /// e.g. "schedule_retry", "mark_dead"
    pub decision: String,

    pub context: Option<serde_json::Value>,

    #[serde(skip)]
    pub decided_at: Instant,
}

impl DecisionRecord {
    pub fn new(
        task_id: TaskId,
        trigger: serde_json::Value,
        policy: impl Into<String>,
        decision: impl Into<String>,
        context: Option<serde_json::Value>,
    ) -> Self {
        Self {
            task_id,
            trigger,
            policy: policy.into(),
            decision: decision.into(),
            context,
            decided_at: Instant::now(),
        }
    }
}
