//! Plugin bootstrap: wire the ports into listeners and job handlers.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::StatusPolicy;
use crate::delivery::DeliveryAgent;
use crate::domain::{Hook, OrderId, OrderStatus, TaskId};
use crate::error::PluginError;
use crate::exporter::OrderExporter;
use crate::integration::SettingsForm;
use crate::job::ProcessOrderHandler;
use crate::listener::OrderStatusListener;
use crate::ports::{DeliveryLog, OrderStore, SettingsStore, SiteInfo, TaskQueue, Transport};
use crate::runtime::{HandlerRegistry, Runtime};

/// Statuses whose entry triggers a relay job.
pub const WATCHED_STATUSES: [OrderStatus; 2] = [OrderStatus::Processing, OrderStatus::Completed];

/// Host services the plugin runs against.
pub struct PluginDeps {
    pub orders: Arc<dyn OrderStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub site: Arc<dyn SiteInfo>,
    pub transport: Arc<dyn Transport>,
    pub log: Arc<dyn DeliveryLog>,
    pub queue: Arc<dyn TaskQueue>,
    pub status_policy: StatusPolicy,
}

pub struct Plugin {
    listeners: Vec<OrderStatusListener>,
    registry: Arc<HandlerRegistry>,
    settings_form: SettingsForm,
}

impl Plugin {
    /// Register the integration. Listeners and handlers exist only when the
    /// integration is enabled at boot.
    pub async fn boot(deps: PluginDeps) -> Result<Self, PluginError> {
        let settings_form = SettingsForm::new(Arc::clone(&deps.settings));
        let settings = deps.settings.load().await?;

        let mut registry = HandlerRegistry::new();
        let mut listeners = Vec::new();

        if settings.enabled {
            let exporter = Arc::new(OrderExporter::new(deps.orders, Arc::clone(&deps.site)));
            let agent = Arc::new(
                DeliveryAgent::new(deps.transport, deps.site, deps.log)
                    .with_status_policy(deps.status_policy),
            );
            let handler = Arc::new(ProcessOrderHandler::new(exporter, agent, Arc::clone(&deps.settings)));

            for status in WATCHED_STATUSES {
                let listener = OrderStatusListener::new(status, Arc::clone(&deps.queue));
                registry.register(listener.hook().clone(), handler.clone())?;
                debug!(event = %listener.event_name(), hook = %listener.hook(), "listener registered");
                listeners.push(listener);
            }
            info!(listeners = listeners.len(), "integration enabled");
        } else {
            info!("integration disabled; order events are ignored");
        }

        Ok(Self {
            listeners,
            registry: Arc::new(registry),
            settings_form,
        })
    }

    /// Host event entry point. `None` when no listener watches `status`.
    pub async fn on_order_status(
        &self,
        status: OrderStatus,
        order_id: OrderId,
    ) -> Result<Option<TaskId>, PluginError> {
        let Some(listener) = self.listeners.iter().find(|l| l.status() == status) else {
            return Ok(None);
        };
        Ok(Some(listener.on_status_changed(order_id).await?))
    }

    pub fn listeners(&self) -> &[OrderStatusListener] {
        &self.listeners
    }

    pub fn handles(&self, hook: &Hook) -> bool {
        self.registry.contains(hook)
    }

    pub fn settings_form(&self) -> &SettingsForm {
        &self.settings_form
    }

    /// Runtime dispatching the registered process hooks.
    pub fn runtime(&self) -> Arc<Runtime> {
        Arc::new(Runtime::new(Arc::clone(&self.registry)))
    }
}
