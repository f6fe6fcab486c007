//! Queue module: the consumer side of the task queue, plus the in-memory
//! adapter used in development and tests.

mod memory;
mod record;
mod retry;
mod state;

pub use memory::InMemoryTaskQueue;
pub use record::{TaskRecord, TaskStatus};
pub use retry::RetryPolicy;
pub use state::TaskState;

use async_trait::async_trait;

use crate::domain::{TaskEnvelope, TaskId};
use crate::error::QueueError;
use crate::observability::QueueCounts;
use crate::ports::TaskQueue;

/// A leased job. The worker owns the lease and must either `ack` or `fail`.
///
/// The queue owns state transitions; the worker only reports results.
#[async_trait]
pub trait TaskLease: Send {
    fn envelope(&self) -> &TaskEnvelope;

    /// 1-based attempt number of this lease.
    fn attempt(&self) -> u32;

    async fn ack(self: Box<Self>) -> Result<(), QueueError>;

    /// Report failure; the queue decides between retry and dead.
    async fn fail(self: Box<Self>, error: String) -> Result<(), QueueError>;
}

/// Consumer side of the queue.
#[async_trait]
pub trait Queue: TaskQueue {
    /// Wait for a runnable job. `None` once the queue is closed and drained.
    async fn lease(&self) -> Option<Box<dyn TaskLease>>;

    async fn status(&self, task_id: TaskId) -> Result<TaskStatus, QueueError>;

    async fn counts_by_state(&self) -> Result<QueueCounts, QueueError>;

    /// Stop accepting jobs and wake idle consumers.
    async fn close(&self);
}
