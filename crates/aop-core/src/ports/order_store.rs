//! OrderStore port - read access to the host's orders and products.

use async_trait::async_trait;

use crate::domain::{Order, OrderId, Product, ProductId};
use crate::error::StoreError;

/// Read-only view of the host store.
///
/// `Ok(None)` means "no such record"; `Err` is reserved for the store itself
/// misbehaving. The exporter treats the two differently only for products.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
}
