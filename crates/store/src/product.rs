use async_trait::async_trait;
use domain::{Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Catalog record for a product, as needed at order-creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,

    /// GST-inclusive unit price.
    pub price: Money,

    /// Units currently available for sale.
    pub availability: u32,
}

/// Read boundary over the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetches a product by id.
    async fn get(&self, id: &ProductId) -> Result<Option<ProductRecord>>;

    /// Inserts or replaces a product record.
    async fn upsert(&self, product: ProductRecord) -> Result<()>;
}
