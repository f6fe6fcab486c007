//! The deferred job behind every process hook: export the order, deliver it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::delivery::DeliveryAgent;
use crate::domain::{DeliveryOutcome, TaskEnvelope};
use crate::error::JobError;
use crate::exporter::OrderExporter;
use crate::ports::SettingsStore;
use crate::runtime::TaskHandler;

pub struct ProcessOrderHandler {
    exporter: Arc<OrderExporter>,
    agent: Arc<DeliveryAgent>,
    settings: Arc<dyn SettingsStore>,
}

impl ProcessOrderHandler {
    pub fn new(
        exporter: Arc<OrderExporter>,
        agent: Arc<DeliveryAgent>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            exporter,
            agent,
            settings,
        }
    }
}

#[async_trait]
impl TaskHandler for ProcessOrderHandler {
    /// Settings are loaded per job, so a change applies from the next job on.
    #[instrument(skip_all, fields(task_id = %envelope.task_id(), hook = %envelope.hook()))]
    async fn handle(&self, envelope: &TaskEnvelope) -> Result<(), JobError> {
        let order_id = envelope
            .order_id()
            .ok_or_else(|| JobError::BadArgs(format!("{:?}", envelope.args())))?;

        let settings = self.settings.load().await?;
        if !settings.enabled {
            info!(order_id = %order_id, "integration disabled; skipping job");
            return Ok(());
        }

        let records = self.exporter.export(order_id).await?;

        match self.agent.deliver(&records, &settings.url).await {
            DeliveryOutcome::Success { .. } => Ok(()),
            DeliveryOutcome::Failure { reason } => Err(JobError::Delivery(reason)),
        }
    }
}
