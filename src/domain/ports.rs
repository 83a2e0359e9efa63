use super::product::{NewProduct, Product};
use super::sale::{Sale, SaleDraft};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Assigns the next id and stores the product.
    async fn insert(&self, product: NewProduct) -> Result<Product>;
    async fn get(&self, id: u32) -> Result<Option<Product>>;
    /// All products, ordered by id.
    async fn all(&self) -> Result<Vec<Product>>;
}

#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Deducts stock for every line and stores the sale as one atomic step.
    ///
    /// If any line fails, no stock is deducted and nothing is stored.
    async fn record_sale(&self, draft: SaleDraft, timestamp: DateTime<Utc>) -> Result<Sale>;
    async fn get(&self, id: u32) -> Result<Option<Sale>>;
}

pub type ProductStoreBox = Box<dyn ProductStore>;
pub type SaleStoreBox = Box<dyn SaleStore>;
pub type ProductStoreFactory = Box<dyn Fn() -> ProductStoreBox + Send + Sync>;
