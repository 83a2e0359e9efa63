use crate::domain::ports::{ProductStore, SaleStore};
use crate::domain::product::{NewProduct, Product};
use crate::domain::sale::{self, Sale, SaleDraft};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    products: BTreeMap<u32, Product>,
    sales: HashMap<u32, Sale>,
    last_product_id: u32,
    last_sale_id: u32,
    last_item_id: u32,
}

/// A thread-safe in-memory store for products and sales.
///
/// Both tables live behind one `Arc<RwLock<_>>`, so recording a sale holds a
/// single write lock across the stock check, the deduction and the insert.
/// Clones share the same state.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        product.validate()?;
        let mut state = self.state.write().await;
        state.last_product_id += 1;
        let product = product.with_id(state.last_product_id);
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: u32) -> Result<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        Ok(state.products.values().cloned().collect())
    }
}

#[async_trait]
impl SaleStore for InMemoryStore {
    async fn record_sale(&self, draft: SaleDraft, timestamp: DateTime<Utc>) -> Result<Sale> {
        let mut state = self.state.write().await;

        let mut touched: HashMap<u32, Product> = draft
            .product_ids()
            .filter_map(|id| state.products.get(&id).map(|p| (id, p.clone())))
            .collect();

        let sale_id = state.last_sale_id + 1;
        let items = sale::settle(&draft, &mut touched, sale_id, state.last_item_id + 1)?;

        state.last_sale_id = sale_id;
        state.last_item_id += items.len() as u32;
        state.products.extend(touched);

        let sale = Sale {
            id: sale_id,
            timestamp,
            items,
        };
        state.sales.insert(sale_id, sale.clone());
        Ok(sale)
    }

    async fn get(&self, id: u32) -> Result<Option<Sale>> {
        let state = self.state.read().await;
        Ok(state.sales.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::domain::sale::SaleLine;
    use crate::error::PosError;
    use rust_decimal_macros::dec;

    fn product(name: &str, quantity: u32) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Money::new(dec!(20.00)),
            cost: Money::new(dec!(8.00)),
            quantity,
            description: None,
        }
    }

    fn draft(lines: &[(u32, u32)]) -> SaleDraft {
        SaleDraft::new(lines.iter().map(|&(product_id, quantity)| SaleLine {
            product_id,
            quantity,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_product_store() {
        let store = InMemoryStore::new();
        let first = store.insert(product("Water", 10)).await.unwrap();
        let second = store.insert(product("Soda", 3)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let retrieved = ProductStore::get(&store, 2).await.unwrap().unwrap();
        assert_eq!(retrieved, second);
        assert!(ProductStore::get(&store, 3).await.unwrap().is_none());

        let all = store.all().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_product() {
        let store = InMemoryStore::new();
        let result = store.insert(product(" ", 1)).await;
        assert!(matches!(result, Err(PosError::ValidationError(_))));
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_sale_deducts_stock() {
        let store = InMemoryStore::new();
        store.insert(product("Water", 10)).await.unwrap();
        store.insert(product("Soda", 3)).await.unwrap();

        let sale = store
            .record_sale(draft(&[(1, 4), (2, 3)]), Utc::now())
            .await
            .unwrap();
        assert_eq!(sale.id, 1);
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.total(), Money::new(dec!(140.00)));

        let all = store.all().await.unwrap();
        assert_eq!(all[0].quantity, 6);
        assert_eq!(all[1].quantity, 0);

        let stored = SaleStore::get(&store, 1).await.unwrap().unwrap();
        assert_eq!(stored, sale);
    }

    #[tokio::test]
    async fn test_failed_sale_changes_nothing() {
        let store = InMemoryStore::new();
        store.insert(product("Water", 10)).await.unwrap();
        store.insert(product("Soda", 3)).await.unwrap();

        let result = store
            .record_sale(draft(&[(1, 4), (2, 4)]), Utc::now())
            .await;
        assert!(matches!(result, Err(PosError::InsufficientStock { .. })));

        let result = store
            .record_sale(draft(&[(1, 1), (99, 1)]), Utc::now())
            .await;
        assert!(matches!(result, Err(PosError::ProductNotFound(99))));

        let all = store.all().await.unwrap();
        assert_eq!(all[0].quantity, 10);
        assert_eq!(all[1].quantity, 3);
        assert!(SaleStore::get(&store, 1).await.unwrap().is_none());

        // Ids are only consumed by successful sales.
        let sale = store
            .record_sale(draft(&[(1, 1)]), Utc::now())
            .await
            .unwrap();
        assert_eq!(sale.id, 1);
        assert_eq!(sale.items[0].id, 1);
    }

    #[tokio::test]
    async fn test_concurrent_sales_never_oversell() {
        let store = InMemoryStore::new();
        store.insert(product("Last croissants", 5)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.record_sale(draft(&[(1, 1)]), Utc::now()).await
            }));
        }

        let mut sold = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                sold += 1;
            }
        }
        assert_eq!(sold, 5);
        let remaining = ProductStore::get(&store, 1).await.unwrap().unwrap();
        assert_eq!(remaining.quantity, 0);
    }
}
