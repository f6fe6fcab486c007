//! Report records: the flat, per-line-item rows sent to the webhook.
//!
//! Field names and order are part of the wire contract with existing
//! consumers, so `ReportRecord` is serialized exactly as declared.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use super::ids::{OrderId, ProductId};
use super::order::{LineItem, Order, OrderStatus};

/// Rendered in `ITEM_SKU` when the product or its SKU cannot be resolved.
pub const SKU_PLACEHOLDER: &str = "-";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Registrable domain label of a site URL, or the "unknown" sentinel.
///
/// Serializes as a JSON string, or as `false` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceTag {
    Label(String),
    Unknown,
}

impl SourceTag {
    pub fn as_label(&self) -> Option<&str> {
        match self {
            SourceTag::Label(label) => Some(label),
            SourceTag::Unknown => None,
        }
    }

    /// Form-body rendering; the host encodes boolean false as "0".
    pub fn form_value(&self) -> String {
        match self {
            SourceTag::Label(label) => label.clone(),
            SourceTag::Unknown => "0".to_string(),
        }
    }
}

impl Serialize for SourceTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SourceTag::Label(label) => serializer.serialize_str(label),
            SourceTag::Unknown => serializer.serialize_bool(false),
        }
    }
}

/// Round to cents and pin the scale so `5` renders as `"5.00"`.
pub fn money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Shipping total spread evenly over the order's line items.
pub fn shipping_share(shipping_total: Decimal, item_count: usize) -> Decimal {
    if item_count == 0 {
        return money(Decimal::ZERO);
    }
    let share = shipping_total
        .checked_div(Decimal::from(item_count as u64))
        .unwrap_or(Decimal::ZERO);
    money(share)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ReportRecord {
    pub source: SourceTag,
    pub order_number: OrderId,
    pub order_date: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub order_status: OrderStatus,
    pub payment_method: String,
    pub item_sku: String,
    pub item_id: ProductId,
    pub item_name: String,
    pub item_qty: u32,
    pub item_cost: Decimal,
    pub shipping_cost: Decimal,
    pub item_total: Decimal,
}

impl ReportRecord {
    /// Flatten one line item of `order`.
    ///
    /// `shipping` is this line's share of the order shipping total and is
    /// added on top of the line total in `ITEM_TOTAL`.
    pub fn from_line(
        order: &Order,
        item: &LineItem,
        source: SourceTag,
        sku: Option<String>,
        shipping: Decimal,
    ) -> Self {
        let item_sku = sku
            .filter(|sku| !sku.trim().is_empty())
            .unwrap_or_else(|| SKU_PLACEHOLDER.to_string());

        Self {
            source,
            order_number: order.id,
            order_date: order.dates.created.map(|d| d.format(DATE_FORMAT).to_string()),
            full_name: order.full_name(),
            email: order.billing.email.clone(),
            phone: order.billing.phone.clone(),
            address: order.delivery_address().one_line(),
            order_status: order.status,
            payment_method: order.payment_method_title.clone(),
            item_sku,
            item_id: item.product_id,
            item_name: item.name.clone(),
            item_qty: item.quantity,
            item_cost: money(item.subtotal),
            shipping_cost: money(shipping),
            item_total: money(item.total + shipping),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_order() -> Order {
        let mut order = Order::new(OrderId::new(123), OrderStatus::Completed);
        order.billing.first_name = "Jane".into();
        order.billing.last_name = "Doe".into();
        order.billing.email = "jane@example.com".into();
        order.payment_method_title = "Direct bank transfer".into();
        order.shipping_total = Decimal::new(500, 2);
        order.dates.created = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
        order.items.push(
            LineItem::new(ProductId::new(55), "Mug", 2)
                .with_amounts(Decimal::new(2000, 2), Decimal::new(1800, 2)),
        );
        order
    }

    #[test]
    fn source_tag_serializes_as_string_or_false() {
        let label = serde_json::to_string(&SourceTag::Label("example".into())).unwrap();
        assert_eq!(label, "\"example\"");
        let unknown = serde_json::to_string(&SourceTag::Unknown).unwrap();
        assert_eq!(unknown, "false");
    }

    #[test]
    fn money_pins_two_decimals() {
        assert_eq!(money(Decimal::new(5, 0)).to_string(), "5.00");
        assert_eq!(money(Decimal::new(12345, 3)).to_string(), "12.35");
    }

    #[test]
    fn shipping_share_splits_evenly() {
        assert_eq!(shipping_share(Decimal::new(500, 2), 1).to_string(), "5.00");
        assert_eq!(shipping_share(Decimal::new(1000, 2), 3).to_string(), "3.33");
        assert_eq!(shipping_share(Decimal::new(1000, 2), 0).to_string(), "0.00");
    }

    #[test]
    fn record_adds_shipping_share_to_item_total() {
        let order = sample_order();
        let share = shipping_share(order.shipping_total, order.items.len());
        let record = ReportRecord::from_line(
            &order,
            &order.items[0],
            SourceTag::Label("example".into()),
            Some("MUG-1".into()),
            share,
        );

        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["ORDER_NUMBER"], 123);
        assert_eq!(v["ORDER_DATE"], "2024-03-01 09:30:00");
        assert_eq!(v["FULL_NAME"], "Jane Doe");
        assert_eq!(v["ORDER_STATUS"], "completed");
        assert_eq!(v["ITEM_SKU"], "MUG-1");
        assert_eq!(v["ITEM_ID"], 55);
        assert_eq!(v["ITEM_QTY"], 2);
        assert_eq!(v["ITEM_COST"], "20.00");
        assert_eq!(v["SHIPPING_COST"], "5.00");
        assert_eq!(v["ITEM_TOTAL"], "23.00");
    }

    #[test]
    fn blank_sku_renders_placeholder() {
        let order = sample_order();
        let record = ReportRecord::from_line(
            &order,
            &order.items[0],
            SourceTag::Unknown,
            Some("  ".into()),
            Decimal::ZERO,
        );
        assert_eq!(record.item_sku, SKU_PLACEHOLDER);
    }

    #[test]
    fn field_order_is_stable() {
        let order = sample_order();
        let record = ReportRecord::from_line(&order, &order.items[0], SourceTag::Unknown, None, Decimal::ZERO);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with("{\"SOURCE\":false,\"ORDER_NUMBER\":123,"));
        assert!(json.ends_with("\"ITEM_TOTAL\":\"18.00\"}"));
    }
}
