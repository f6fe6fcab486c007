//! Order model as read from the host store.
//!
//! The relay never creates or mutates orders; these types are a read-only
//! snapshot of what the host hands back for one order id.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{OrderId, ProductId};

/// Order status slugs used by the host store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl OrderStatus {
    pub fn slug(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::OnHold => "on-hold",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }

    /// Name of the host event fired when an order enters this status.
    pub fn event_name(self) -> String {
        format!("woocommerce_order_status_{}", self.slug())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
}

impl Address {
    /// An address without a first line is treated as not filled in.
    pub fn is_blank(&self) -> bool {
        self.address_1.trim().is_empty()
    }

    /// Non-empty parts joined by ", ".
    pub fn one_line(&self) -> String {
        [
            &self.address_1,
            &self.address_2,
            &self.city,
            &self.state,
            &self.postcode,
            &self.country,
        ]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDates {
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
    pub paid: Option<DateTime<Utc>>,
}

/// One product line of an order. Owned by exactly one `Order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub variation_id: Option<ProductId>,
    pub name: String,
    pub quantity: u32,
    pub subtotal: Decimal,
    pub total: Decimal,
}

impl LineItem {
    pub fn new(product_id: ProductId, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id,
            variation_id: None,
            name: name.into(),
            quantity,
            subtotal: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    pub fn with_variation(mut self, variation_id: ProductId) -> Self {
        self.variation_id = Some(variation_id);
        self
    }

    pub fn with_amounts(mut self, subtotal: Decimal, total: Decimal) -> Self {
        self.subtotal = subtotal;
        self.total = total;
        self
    }

    /// The id the SKU lookup should use: the variation when one is set and
    /// non-zero, the parent product otherwise.
    pub fn sku_lookup_id(&self) -> ProductId {
        match self.variation_id {
            Some(variation) if !variation.is_unset() => variation,
            _ => self.product_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(default)]
    pub billing: Contact,
    #[serde(default)]
    pub billing_address: Address,
    #[serde(default)]
    pub shipping_address: Address,
    #[serde(default)]
    pub payment_method_title: String,
    #[serde(default)]
    pub shipping_total: Decimal,
    #[serde(default)]
    pub dates: OrderDates,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Order {
    pub fn new(id: OrderId, status: OrderStatus) -> Self {
        Self {
            id,
            status,
            billing: Contact::default(),
            billing_address: Address::default(),
            shipping_address: Address::default(),
            payment_method_title: String::new(),
            shipping_total: Decimal::ZERO,
            dates: OrderDates::default(),
            items: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.billing.first_name.trim(), self.billing.last_name.trim())
            .trim()
            .to_string()
    }

    /// Where the goods go: the shipping address when filled in, billing otherwise.
    pub fn delivery_address(&self) -> &Address {
        if self.shipping_address.is_blank() {
            &self.billing_address
        } else {
            &self.shipping_address
        }
    }
}

/// Product as resolved for SKU lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: Option<String>,
}

impl Product {
    pub fn new(id: ProductId, sku: Option<String>) -> Self {
        Self { id, sku }
    }
}
