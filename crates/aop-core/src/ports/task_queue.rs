//! TaskQueue port - the producer side of the host scheduler.

use async_trait::async_trait;

use crate::domain::{Hook, TaskId};
use crate::error::QueueError;

/// `enqueue(hook, args, group)` and return at once; when the job runs is up
/// to the scheduler.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(
        &self,
        hook: Hook,
        args: Vec<serde_json::Value>,
        group: &str,
    ) -> Result<TaskId, QueueError>;
}
