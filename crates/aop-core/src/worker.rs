use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::queue::Queue;
use crate::runtime::Runtime;

/// Worker group handle.
/// - `request_shutdown` stops every worker from taking new leases
/// - `shutdown_and_join` also waits for in-flight jobs to finish
pub struct WorkerGroup {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl WorkerGroup {
    /// Spawn `n` workers.
    pub fn spawn(n: usize, queue: Arc<dyn Queue>, runtime: Arc<Runtime>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut joins = Vec::with_capacity(n);
        for worker_id in 0..n {
            let q = Arc::clone(&queue);
            let rt = Arc::clone(&runtime);
            let mut rx = shutdown_rx.clone();

            let join = tokio::spawn(async move {
                worker_loop(worker_id, q, rt, &mut rx).await;
            });
            joins.push(join);
        }

        Self { shutdown_tx, joins }
    }

    /// Request shutdown for all workers. In-flight handlers are not cancelled.
    pub fn request_shutdown(&self) {
        // receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for j in self.joins {
            if let Err(err) = j.await {
                warn!(error = %err, "worker task panicked");
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: Arc<dyn Queue>,
    runtime: Arc<Runtime>,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    debug!(worker_id, "worker started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        // lease may wait, so race it against shutdown
        let lease = tokio::select! {
            _ = shutdown_rx.changed() => continue,
            lease = queue.lease() => lease,
        };

        // None means closed and drained
        let Some(lease) = lease else {
            break;
        };

        let envelope = lease.envelope().clone();
        let attempt = lease.attempt();

        match runtime.execute(&envelope).await {
            Ok(()) => {
                debug!(worker_id, task_id = %envelope.task_id(), hook = %envelope.hook(), attempt, "job succeeded");
                if let Err(e) = lease.ack().await {
                    warn!(worker_id, error = %e, "ack failed");
                }
            }
            Err(err) => {
                info!(worker_id, task_id = %envelope.task_id(), hook = %envelope.hook(), attempt, error = %err, "job failed");
                if let Err(e) = lease.fail(err.to_string()).await {
                    warn!(worker_id, error = %e, "fail report failed");
                }
            }
        }
    }
    debug!(worker_id, "worker stopped");
}
