//! In-memory queue implementation.

use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, warn};

use super::{Queue, RetryPolicy, TaskLease, TaskRecord, TaskState, TaskStatus};
use crate::domain::{AttemptRecord, DecisionRecord, Hook, TaskEnvelope, TaskId};
use crate::error::QueueError;
use crate::observability::QueueCounts;
use crate::ports::{IdGenerator, SystemClock, TaskQueue, UlidGenerator};

/// Entry of the retry heap. Reverse ordering turns `BinaryHeap` into a
/// min-heap (earliest first).
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledTask {
    next_run_at: Instant,
    task_id: TaskId,
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.next_run_at.cmp(&self.next_run_at)
    }
}

struct InMemoryQueueState {
    records: HashMap<TaskId, TaskRecord>,

    /// Ready queue (ids only), FIFO.
    ready: VecDeque<TaskId>,

    /// Tasks waiting out a backoff delay.
    scheduled: BinaryHeap<ScheduledTask>,

    attempts: Vec<AttemptRecord>,
    decisions: Vec<DecisionRecord>,

    retry_policy: RetryPolicy,
    closed: bool,
}

impl InMemoryQueueState {
    fn new(retry_policy: RetryPolicy) -> Self {
        Self {
            records: HashMap::new(),
            ready: VecDeque::new(),
            scheduled: BinaryHeap::new(),
            attempts: Vec::new(),
            decisions: Vec::new(),
            retry_policy,
            closed: false,
        }
    }

    /// Move tasks whose backoff has elapsed back to the ready queue.
    fn promote_scheduled_tasks(&mut self) {
        let now = Instant::now();
        while let Some(entry) = self.scheduled.peek() {
            if entry.next_run_at > now {
                break;
            }
            let Some(entry) = self.scheduled.pop() else {
                break;
            };
            if let Some(record) = self.records.get_mut(&entry.task_id)
                && record.state == TaskState::RetryScheduled
            {
                record.requeue();
                self.ready.push_back(entry.task_id);
            }
        }
    }

    fn counts_by_state(&self) -> QueueCounts {
        let mut counts = QueueCounts::default();
        for record in self.records.values() {
            match record.state {
                TaskState::Queued => counts.queued += 1,
                TaskState::Running => counts.running += 1,
                TaskState::Succeeded => counts.succeeded += 1,
                TaskState::RetryScheduled => counts.retry_scheduled += 1,
                TaskState::Dead => counts.dead += 1,
            }
        }
        counts
    }
}

/// Development stand-in for the host scheduler.
pub struct InMemoryTaskQueue {
    state: Arc<Mutex<InMemoryQueueState>>,
    notify: Arc<Notify>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryTaskQueue {
    pub fn new(retry_policy: RetryPolicy) -> Self {
        Self::with_id_generator(retry_policy, Arc::new(UlidGenerator::new(SystemClock)))
    }

    pub fn with_id_generator(retry_policy: RetryPolicy, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryQueueState::new(retry_policy))),
            notify: Arc::new(Notify::new()),
            ids,
        }
    }

    /// Execution history, oldest first.
    pub async fn attempts(&self) -> Vec<AttemptRecord> {
        self.state.lock().await.attempts.clone()
    }

    /// Retry decisions, oldest first.
    pub async fn decisions(&self) -> Vec<DecisionRecord> {
        self.state.lock().await.decisions.clone()
    }

    fn take_ready(&self, state: &mut InMemoryQueueState) -> Option<Box<dyn TaskLease>> {
        while let Some(task_id) = state.ready.pop_front() {
            let Some(record) = state.records.get_mut(&task_id) else {
                continue;
            };
            record.start_attempt();
            return Some(Box::new(InMemoryLease {
                task_id,
                attempt: record.attempts,
                envelope: record.envelope.clone(),
                queue: Arc::clone(&self.state),
                notify: Arc::clone(&self.notify),
                ids: Arc::clone(&self.ids),
            }));
        }
        None
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(
        &self,
        hook: Hook,
        args: Vec<serde_json::Value>,
        group: &str,
    ) -> Result<TaskId, QueueError> {
        let task_id = self.ids.generate_task_id();
        {
            let mut state = self.state.lock().await;
            if state.closed {
                return Err(QueueError::Closed);
            }
            let envelope = TaskEnvelope::new(task_id, hook, args, group);
            let record = TaskRecord::new(envelope, state.retry_policy.max_attempts);
            state.records.insert(task_id, record);
            state.ready.push_back(task_id);
        }
        self.notify.notify_one();
        Ok(task_id)
    }
}

#[async_trait]
impl Queue for InMemoryTaskQueue {
    async fn lease(&self) -> Option<Box<dyn TaskLease>> {
        loop {
            // Register interest before looking at the state so a notify
            // between the check and the wait is not lost.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let next_wake = {
                let mut state = self.state.lock().await;
                state.promote_scheduled_tasks();

                if let Some(lease) = self.take_ready(&mut state) {
                    return Some(lease);
                }
                if state.closed && state.scheduled.is_empty() {
                    return None;
                }
                state.scheduled.peek().map(|entry| entry.next_run_at)
            };

            if let Some(wake_time) = next_wake {
                tokio::select! {
                    _ = &mut notified => {},
                    _ = tokio::time::sleep_until(wake_time.into()) => {},
                }
            } else {
                notified.await;
            }
        }
    }

    async fn status(&self, task_id: TaskId) -> Result<TaskStatus, QueueError> {
        let state = self.state.lock().await;
        state
            .records
            .get(&task_id)
            .map(TaskRecord::status)
            .ok_or(QueueError::TaskNotFound(task_id))
    }

    async fn counts_by_state(&self) -> Result<QueueCounts, QueueError> {
        Ok(self.state.lock().await.counts_by_state())
    }

    async fn close(&self) {
        self.state.lock().await.closed = true;
        self.notify.notify_waiters();
    }
}

struct InMemoryLease {
    task_id: TaskId,
    attempt: u32,
    envelope: TaskEnvelope,
    queue: Arc<Mutex<InMemoryQueueState>>,
    notify: Arc<Notify>,
    ids: Arc<dyn IdGenerator>,
}

#[async_trait]
impl TaskLease for InMemoryLease {
    fn envelope(&self) -> &TaskEnvelope {
        &self.envelope
    }

    fn attempt(&self) -> u32 {
        self.attempt
    }

    async fn ack(self: Box<Self>) -> Result<(), QueueError> {
        let mut state = self.queue.lock().await;

        let attempt = AttemptRecord::new(
            self.ids.generate_attempt_id(),
            self.task_id,
            self.envelope.hook().clone(),
            self.attempt,
            None,
        );
        state.attempts.push(attempt);

        let record = state
            .records
            .get_mut(&self.task_id)
            .ok_or(QueueError::TaskNotFound(self.task_id))?;
        record.mark_succeeded();
        Ok(())
    }

    async fn fail(self: Box<Self>, error: String) -> Result<(), QueueError> {
        let should_notify = {
            let mut state = self.queue.lock().await;
            let retry_policy = state.retry_policy.clone();

            let attempt = AttemptRecord::new(
                self.ids.generate_attempt_id(),
                self.task_id,
                self.envelope.hook().clone(),
                self.attempt,
                Some(error.clone()),
            );
            state.attempts.push(attempt);

            let Some(record) = state.records.get_mut(&self.task_id) else {
                return Err(QueueError::TaskNotFound(self.task_id));
            };

            let trigger = serde_json::json!({
                "error": error,
                "attempts": record.attempts,
                "max_attempts": record.max_attempts,
            });

            if record.has_attempts_left() {
                let delay = retry_policy.next_delay(record.attempts);
                let next_run_at = Instant::now() + delay;
                let context = Some(serde_json::json!({
                    "delay_ms": delay.as_millis() as u64,
                }));

                record.schedule_retry(next_run_at, error);
                debug!(task_id = %self.task_id, delay_ms = delay.as_millis() as u64, "retry scheduled");

                let decision =
                    DecisionRecord::new(self.task_id, trigger, "retry_policy", "schedule_retry", context);
                state.decisions.push(decision);
                state.scheduled.push(ScheduledTask {
                    next_run_at,
                    task_id: self.task_id,
                });
                true
            } else {
                record.mark_dead(error);
                warn!(task_id = %self.task_id, hook = %self.envelope.hook(), "job is dead");

                let decision =
                    DecisionRecord::new(self.task_id, trigger, "retry_policy", "mark_dead", None);
                state.decisions.push(decision);
                false
            }
        };

        // Notify outside the lock.
        if should_notify {
            self.notify.notify_one();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AOP_GROUP;
    use std::time::Duration;

    async fn enqueue_one(queue: &InMemoryTaskQueue) -> TaskId {
        queue
            .enqueue(Hook::new("test"), vec![serde_json::json!(1)], AOP_GROUP)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn enqueue_and_counts() {
        let queue = InMemoryTaskQueue::new(RetryPolicy::none());
        let task_id = enqueue_one(&queue).await;

        let counts = queue.counts_by_state().await.unwrap();
        assert_eq!(counts.queued, 1);
        assert_eq!(counts.running, 0);

        let status = queue.status(task_id).await.unwrap();
        assert_eq!(status.state, TaskState::Queued);
        assert_eq!(status.hook.as_str(), "test");
    }

    #[tokio::test]
    async fn lease_transitions_to_running() {
        let queue = InMemoryTaskQueue::new(RetryPolicy::none());
        enqueue_one(&queue).await;

        let lease = tokio::time::timeout(Duration::from_millis(100), queue.lease())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(lease.envelope().hook().as_str(), "test");
        assert_eq!(lease.envelope().group(), AOP_GROUP);
        assert_eq!(lease.attempt(), 1);

        let counts = queue.counts_by_state().await.unwrap();
        assert_eq!(counts.queued, 0);
        assert_eq!(counts.running, 1);
    }

    #[tokio::test]
    async fn ack_marks_succeeded_and_records_attempt() {
        let queue = InMemoryTaskQueue::new(RetryPolicy::none());
        let task_id = enqueue_one(&queue).await;
        queue.lease().await.unwrap().ack().await.unwrap();

        assert_eq!(queue.status(task_id).await.unwrap().state, TaskState::Succeeded);
        let attempts = queue.attempts().await;
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].succeeded());
    }

    #[tokio::test]
    async fn single_attempt_policy_marks_dead_on_first_failure() {
        let queue = InMemoryTaskQueue::new(RetryPolicy::none());
        let task_id = enqueue_one(&queue).await;
        queue
            .lease()
            .await
            .unwrap()
            .fail("connection refused".to_string())
            .await
            .unwrap();

        let status = queue.status(task_id).await.unwrap();
        assert_eq!(status.state, TaskState::Dead);
        assert_eq!(status.attempts, 1);
        assert_eq!(status.last_error.as_deref(), Some("connection refused"));

        let decisions = queue.decisions().await;
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].decision, "mark_dead");
        assert_eq!(decisions[0].trigger["max_attempts"], 1);
    }

    #[tokio::test]
    async fn bounded_policy_retries_then_dies() {
        let policy = RetryPolicy::bounded(2).with_backoff(Duration::from_millis(10), 1.0);
        let queue = InMemoryTaskQueue::new(policy);
        let task_id = enqueue_one(&queue).await;

        queue.lease().await.unwrap().fail("e1".into()).await.unwrap();
        assert_eq!(queue.status(task_id).await.unwrap().state, TaskState::RetryScheduled);

        let second = tokio::time::timeout(Duration::from_secs(1), queue.lease())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.attempt(), 2);
        second.fail("e2".into()).await.unwrap();

        assert_eq!(queue.status(task_id).await.unwrap().state, TaskState::Dead);
        let decisions: Vec<_> = queue.decisions().await.into_iter().map(|d| d.decision).collect();
        assert_eq!(decisions, ["schedule_retry", "mark_dead"]);
        assert_eq!(queue.attempts().await.len(), 2);
    }

    #[tokio::test]
    async fn closed_queue_drains_then_returns_none() {
        let queue = InMemoryTaskQueue::new(RetryPolicy::none());
        enqueue_one(&queue).await;
        queue.close().await;

        assert!(queue.lease().await.is_some());
        assert!(queue.lease().await.is_none());
        let err = queue.enqueue(Hook::new("late"), vec![], AOP_GROUP).await.unwrap_err();
        assert!(matches!(err, QueueError::Closed));
    }

    #[tokio::test]
    async fn unknown_task_status_is_an_error() {
        let queue = InMemoryTaskQueue::new(RetryPolicy::none());
        let stray = TaskId::from_ulid(ulid::Ulid::new());
        assert!(matches!(queue.status(stray).await, Err(QueueError::TaskNotFound(_))));
    }
}
