//! Order status listeners: turn a host status event into a deferred job.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::{AOP_GROUP, Hook, OrderId, OrderStatus, TaskId};
use crate::error::QueueError;
use crate::ports::TaskQueue;

/// One listener per watched status. Does no work beyond the enqueue, so the
/// host request that fired the event is never held up by delivery.
pub struct OrderStatusListener {
    status: OrderStatus,
    hook: Hook,
    queue: Arc<dyn TaskQueue>,
}

impl OrderStatusListener {
    pub fn new(status: OrderStatus, queue: Arc<dyn TaskQueue>) -> Self {
        Self {
            status,
            hook: Hook::process_order(status),
            queue,
        }
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Hook of the jobs this listener enqueues.
    pub fn hook(&self) -> &Hook {
        &self.hook
    }

    /// Host event this listener is bound to.
    pub fn event_name(&self) -> String {
        self.status.event_name()
    }

    /// Enqueue `[order_id]` under the process hook. Repeated events for the
    /// same order enqueue repeated jobs.
    pub async fn on_status_changed(&self, order_id: OrderId) -> Result<TaskId, QueueError> {
        let task_id = self
            .queue
            .enqueue(self.hook.clone(), vec![json!(order_id.get())], AOP_GROUP)
            .await?;
        info!(order_id = %order_id, status = %self.status, task_id = %task_id, "order job enqueued");
        Ok(task_id)
    }
}
