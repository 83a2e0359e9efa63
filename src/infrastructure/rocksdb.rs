use crate::domain::ports::{ProductStore, SaleStore};
use crate::domain::product::{NewProduct, Product};
use crate::domain::sale::{self, Sale, SaleDraft};
use crate::error::{PosError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing products.
pub const CF_PRODUCTS: &str = "products";
/// Column Family for storing sales together with their items.
pub const CF_SALES: &str = "sales";
/// Column Family for id sequences.
pub const CF_META: &str = "meta";

const SEQ_PRODUCT: &[u8] = b"seq:product";
const SEQ_SALE: &[u8] = b"seq:sale";
const SEQ_ITEM: &[u8] = b"seq:item";

/// A persistent store implementation using RocksDB.
///
/// Products and sales live in separate Column Families, keyed by big-endian id
/// and encoded as JSON. Writers are serialized through a mutex and every sale
/// is committed with a single `WriteBatch`, so stock deductions, the sale row
/// and the id sequences land together or not at all.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_PRODUCTS, CF_SALES, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PosError::InternalError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn read<T: DeserializeOwned>(&self, cf_name: &str, id: u32) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn sequence(&self, key: &[u8]) -> Result<u32> {
        let cf = self.cf(CF_META)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => {
                let raw: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                    PosError::InternalError(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "corrupt sequence value",
                    )))
                })?;
                Ok(u32::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        PosError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Serialization error: {}", e),
        )))
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        PosError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl ProductStore for RocksDBStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        product.validate()?;
        let _guard = self.write_lock.lock().await;

        let id = self.sequence(SEQ_PRODUCT)? + 1;
        let product = product.with_id(id);

        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_PRODUCTS)?, id.to_be_bytes(), encode(&product)?);
        batch.put_cf(self.cf(CF_META)?, SEQ_PRODUCT, id.to_be_bytes());
        self.db.write(batch)?;

        Ok(product)
    }

    async fn get(&self, id: u32) -> Result<Option<Product>> {
        self.read(CF_PRODUCTS, id)
    }

    async fn all(&self) -> Result<Vec<Product>> {
        let cf = self.cf(CF_PRODUCTS)?;
        let mut products = Vec::new();
        // Big-endian keys iterate in id order.
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            products.push(decode(&value)?);
        }
        Ok(products)
    }
}

#[async_trait]
impl SaleStore for RocksDBStore {
    async fn record_sale(&self, draft: SaleDraft, timestamp: DateTime<Utc>) -> Result<Sale> {
        let _guard = self.write_lock.lock().await;

        let mut touched: HashMap<u32, Product> = HashMap::new();
        for id in draft.product_ids() {
            if let Some(product) = self.read(CF_PRODUCTS, id)? {
                touched.insert(id, product);
            }
        }

        let sale_id = self.sequence(SEQ_SALE)? + 1;
        let last_item_id = self.sequence(SEQ_ITEM)?;
        let items = sale::settle(&draft, &mut touched, sale_id, last_item_id + 1)?;
        let last_item_id = last_item_id + items.len() as u32;

        let sale = Sale {
            id: sale_id,
            timestamp,
            items,
        };

        let products_cf = self.cf(CF_PRODUCTS)?;
        let meta_cf = self.cf(CF_META)?;
        let mut batch = WriteBatch::default();
        for product in touched.values() {
            batch.put_cf(products_cf, product.id.to_be_bytes(), encode(product)?);
        }
        batch.put_cf(self.cf(CF_SALES)?, sale_id.to_be_bytes(), encode(&sale)?);
        batch.put_cf(meta_cf, SEQ_SALE, sale_id.to_be_bytes());
        batch.put_cf(meta_cf, SEQ_ITEM, last_item_id.to_be_bytes());
        self.db.write(batch)?;

        Ok(sale)
    }

    async fn get(&self, id: u32) -> Result<Option<Sale>> {
        self.read(CF_SALES, id)
    }
}
