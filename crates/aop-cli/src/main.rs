//! Demo relay: seeds an in-memory store with one order, boots the plugin from
//! the environment, fires the `completed` event and runs the queue until the
//! job is done.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::time::{Duration, sleep};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aop_core::config::RelayConfig;
use aop_core::delivery::{ReqwestTransport, TracingDeliveryLog};
use aop_core::domain::{
    Address, Contact, LineItem, Order, OrderId, OrderStatus, Product, ProductId, Settings, TaskId,
};
use aop_core::impls::{InMemoryOrderStore, InMemorySettingsStore, StaticSite};
use aop_core::plugin::{Plugin, PluginDeps};
use aop_core::queue::{InMemoryTaskQueue, Queue, TaskStatus};
use aop_core::worker::WorkerGroup;

const SAMPLE_ORDER: u64 = 123;

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".into());

    let json = std::env::var("AOP_LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn seed_store() -> InMemoryOrderStore {
    let store = InMemoryOrderStore::new();

    let mut order = Order::new(OrderId::new(SAMPLE_ORDER), OrderStatus::Completed);
    order.billing = Contact {
        first_name: "Ana".into(),
        last_name: "Reyes".into(),
        email: "ana@example.com".into(),
        phone: "+63 917 000 0000".into(),
    };
    order.shipping_address = Address {
        address_1: "12 Mabini St".into(),
        city: "Makati".into(),
        state: "NCR".into(),
        postcode: "1200".into(),
        country: "PH".into(),
        ..Address::default()
    };
    order.payment_method_title = "Cash on delivery".into();
    order.shipping_total = Decimal::new(500, 2);
    order.dates.created = Some(Utc::now());
    order.items.push(
        LineItem::new(ProductId::new(55), "Mug", 2)
            .with_amounts(Decimal::new(2000, 2), Decimal::new(1800, 2)),
    );

    store.insert_order(order).await;
    store
        .insert_product(Product::new(ProductId::new(55), Some("MUG-01".into())))
        .await;
    store
}

async fn wait_for_terminal(queue: &InMemoryTaskQueue, task_id: TaskId) -> anyhow::Result<TaskStatus> {
    loop {
        let status = queue.status(task_id).await?;
        if status.state.is_terminal() {
            return Ok(status);
        }
        sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // a missing .env is fine
        if !e.not_found() {
            eprintln!("warning: could not read .env: {e}");
        }
    }
    init_tracing();

    let config = RelayConfig::from_env().context("loading relay configuration")?;
    info!(site = %config.site_url, workers = config.workers, "starting relay demo");

    let settings = Arc::new(InMemorySettingsStore::new(Settings::new(
        config.enabled,
        config.webhook_url.clone().unwrap_or_default(),
    )));
    let queue = Arc::new(InMemoryTaskQueue::new(config.retry_policy()));
    let transport = ReqwestTransport::new(&config.delivery).context("building http client")?;

    let plugin = Plugin::boot(PluginDeps {
        orders: Arc::new(seed_store().await),
        settings,
        site: Arc::new(StaticSite::new(config.site_url.clone())),
        transport: Arc::new(transport),
        log: Arc::new(TracingDeliveryLog),
        queue: queue.clone(),
        status_policy: config.delivery.status_policy,
    })
    .await?;

    let Some(task_id) = plugin
        .on_order_status(OrderStatus::Completed, OrderId::new(SAMPLE_ORDER))
        .await?
    else {
        warn!("integration is disabled (set AOP_ENABLED=yes); nothing to do");
        return Ok(());
    };

    let workers = WorkerGroup::spawn(config.workers, queue.clone(), plugin.runtime());

    let outcome = tokio::select! {
        status = wait_for_terminal(&queue, task_id) => Some(status?),
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            None
        }
    };

    queue.close().await;
    workers.shutdown_and_join().await;

    if let Some(status) = outcome {
        println!("final status: {}", serde_json::to_string_pretty(&status)?);
    }
    println!("counts: {}", serde_json::to_string(&queue.counts_by_state().await?)?);
    Ok(())
}
