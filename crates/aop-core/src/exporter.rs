//! Order exporter: one order in, one report record per line item out.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::{LineItem, OrderId, ReportRecord, shipping_share};
use crate::error::ExportError;
use crate::ports::{OrderStore, SiteInfo};
use crate::source::extract_source;

pub struct OrderExporter {
    store: Arc<dyn OrderStore>,
    site: Arc<dyn SiteInfo>,
}

impl OrderExporter {
    pub fn new(store: Arc<dyn OrderStore>, site: Arc<dyn SiteInfo>) -> Self {
        Self { store, site }
    }

    /// Flatten `order_id` into report records, in line item order.
    ///
    /// A missing order is an error. A missing product only costs the line its
    /// SKU, which renders as `"-"`.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn export(&self, order_id: OrderId) -> Result<Vec<ReportRecord>, ExportError> {
        let order = self
            .store
            .order(order_id)
            .await?
            .ok_or(ExportError::OrderNotFound(order_id))?;

        let source = extract_source(&self.site.site_url());
        let shipping = shipping_share(order.shipping_total, order.items.len());

        let mut records = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let sku = self.resolve_sku(item).await;
            records.push(ReportRecord::from_line(&order, item, source.clone(), sku, shipping));
        }

        debug!(records = records.len(), "order exported");
        Ok(records)
    }

    async fn resolve_sku(&self, item: &LineItem) -> Option<String> {
        let product_id = item.sku_lookup_id();
        match self.store.product(product_id).await {
            Ok(Some(product)) => product.sku,
            Ok(None) => {
                warn!(product_id = %product_id, "product not found; using placeholder sku");
                None
            }
            Err(err) => {
                warn!(product_id = %product_id, error = %err, "product lookup failed; using placeholder sku");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, Order, OrderStatus, Product, ProductId, SKU_PLACEHOLDER};
    use crate::impls::{InMemoryOrderStore, StaticSite};
    use rust_decimal::Decimal;

    fn exporter(store: InMemoryOrderStore) -> OrderExporter {
        OrderExporter::new(
            Arc::new(store),
            Arc::new(StaticSite::new("https://shop.example.com")),
        )
    }

    fn order_with_items(id: u64, n: u64) -> Order {
        let mut order = Order::new(OrderId::new(id), OrderStatus::Completed);
        for i in 0..n {
            order.items.push(LineItem::new(ProductId::new(100 + i), format!("item {i}"), 1));
        }
        order
    }

    #[tokio::test]
    async fn one_record_per_line_item_with_order_number() {
        let store = InMemoryOrderStore::new();
        store.insert_order(order_with_items(42, 3)).await;

        let records = exporter(store).export(OrderId::new(42)).await.unwrap();

        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.order_number == OrderId::new(42)));
        let names: Vec<_> = records.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, ["item 0", "item 1", "item 2"]);
    }

    #[tokio::test]
    async fn order_without_items_exports_nothing() {
        let store = InMemoryOrderStore::new();
        store.insert_order(order_with_items(5, 0)).await;
        let records = exporter(store).export(OrderId::new(5)).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn missing_order_is_an_error() {
        let err = exporter(InMemoryOrderStore::new())
            .export(OrderId::new(404))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::OrderNotFound(id) if id == OrderId::new(404)));
    }

    #[tokio::test]
    async fn sku_prefers_variation_then_falls_back_to_placeholder() {
        let store = InMemoryOrderStore::new();
        let mut order = Order::new(OrderId::new(9), OrderStatus::Processing);
        order.items.push(LineItem::new(ProductId::new(1), "varied", 1).with_variation(ProductId::new(2)));
        order.items.push(LineItem::new(ProductId::new(3), "plain", 1));
        order.items.push(LineItem::new(ProductId::new(4), "deleted", 1));
        store.insert_order(order).await;
        store.insert_product(Product::new(ProductId::new(1), Some("PARENT".into()))).await;
        store.insert_product(Product::new(ProductId::new(2), Some("VARIANT".into()))).await;
        store.insert_product(Product::new(ProductId::new(3), None)).await;

        let records = exporter(store).export(OrderId::new(9)).await.unwrap();

        assert_eq!(records[0].item_sku, "VARIANT");
        assert_eq!(records[0].item_id, ProductId::new(1));
        assert_eq!(records[1].item_sku, SKU_PLACEHOLDER);
        assert_eq!(records[2].item_sku, SKU_PLACEHOLDER);
    }

    #[tokio::test]
    async fn unreadable_product_does_not_abort_export() {
        let store = InMemoryOrderStore::new();
        store.insert_order(order_with_items(10, 2)).await;
        store.insert_product(Product::new(ProductId::new(101), Some("OK-1".into()))).await;
        store.make_unreadable(ProductId::new(100)).await;

        let records = exporter(store).export(OrderId::new(10)).await.unwrap();

        assert_eq!(records[0].item_sku, SKU_PLACEHOLDER);
        assert_eq!(records[1].item_sku, "OK-1");
    }

    #[tokio::test]
    async fn export_is_deterministic() {
        let store = InMemoryOrderStore::new();
        store.insert_order(order_with_items(11, 2)).await;
        let exporter = exporter(store);

        let first = serde_json::to_vec(&exporter.export(OrderId::new(11)).await.unwrap()).unwrap();
        let second = serde_json::to_vec(&exporter.export(OrderId::new(11)).await.unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn completed_order_scenario_adds_shipping() {
        let store = InMemoryOrderStore::new();
        let mut order = Order::new(OrderId::new(123), OrderStatus::Completed);
        order.shipping_total = Decimal::new(500, 2);
        order.items.push(
            LineItem::new(ProductId::new(55), "Mug", 2)
                .with_amounts(Decimal::new(2000, 2), Decimal::new(1800, 2)),
        );
        store.insert_order(order).await;

        let records = exporter(store).export(OrderId::new(123)).await.unwrap();
        let v = serde_json::to_value(&records[0]).unwrap();

        assert_eq!(v["SOURCE"], "example");
        assert_eq!(v["ITEM_QTY"], 2);
        assert_eq!(v["ITEM_COST"], "20.00");
        assert_eq!(v["SHIPPING_COST"], "5.00");
        assert_eq!(v["ITEM_TOTAL"], "23.00");
    }
}
