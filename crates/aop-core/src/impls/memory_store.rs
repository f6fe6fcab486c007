//! InMemoryOrderStore - order/product store for tests and the demo binary.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Order, OrderId, Product, ProductId};
use crate::error::StoreError;
use crate::ports::OrderStore;

#[derive(Default)]
struct Tables {
    orders: HashMap<OrderId, Order>,
    products: HashMap<ProductId, Product>,
    /// Products whose lookup errors out instead of returning `None`.
    unreadable: HashSet<ProductId>,
}

#[derive(Default)]
pub struct InMemoryOrderStore {
    tables: RwLock<Tables>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_order(&self, order: Order) {
        self.tables.write().await.orders.insert(order.id, order);
    }

    pub async fn insert_product(&self, product: Product) {
        self.tables.write().await.products.insert(product.id, product);
    }

    /// Make lookups of `id` fail, as a trashed or permission-restricted
    /// product would.
    pub async fn make_unreadable(&self, id: ProductId) {
        self.tables.write().await.unreadable.insert(id);
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let tables = self.tables.read().await;
        if tables.unreadable.contains(&id) {
            return Err(StoreError::Other(format!("product {id} is not readable")));
        }
        Ok(tables.products.get(&id).cloned())
    }
}
