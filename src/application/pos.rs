use crate::domain::ports::{ProductStoreBox, SaleStoreBox};
use crate::domain::product::{NewProduct, Product};
use crate::domain::promptpay::{Payload, PayloadEncoder};
use crate::domain::sale::{Sale, SaleDraft};
use crate::error::{PosError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Entry point for the point-of-sale operations.
///
/// `PosService` owns the storage backends and the payload encoder. It holds no
/// state of its own; stock consistency is delegated to the `SaleStore`.
pub struct PosService {
    products: ProductStoreBox,
    sales: SaleStoreBox,
    encoder: PayloadEncoder,
    merchant_phone: String,
}

impl PosService {
    /// Creates a new `PosService`.
    ///
    /// # Arguments
    ///
    /// * `products` - The product catalogue and stock levels.
    /// * `sales` - The store that settles and records sales.
    /// * `encoder` - Builds PromptPay payloads.
    /// * `merchant_phone` - The PromptPay number that receives payments.
    pub fn new(
        products: ProductStoreBox,
        sales: SaleStoreBox,
        encoder: PayloadEncoder,
        merchant_phone: impl Into<String>,
    ) -> Self {
        Self {
            products,
            sales,
            encoder,
            merchant_phone: merchant_phone.into(),
        }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.products.all().await
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let product = self.products.insert(product).await?;
        info!(id = product.id, name = %product.name, stock = product.quantity, "product created");
        Ok(product)
    }

    /// Settles a multi-item sale, deducting stock for every line.
    ///
    /// Either the whole sale is recorded or nothing changes.
    pub async fn create_sale(&self, draft: SaleDraft) -> Result<Sale> {
        match self.sales.record_sale(draft, Utc::now()).await {
            Ok(sale) => {
                info!(
                    id = sale.id,
                    items = sale.items.len(),
                    total = %sale.total(),
                    "sale recorded"
                );
                Ok(sale)
            }
            Err(e) => {
                warn!(error = %e, "sale rejected");
                Err(e)
            }
        }
    }

    pub async fn get_sale(&self, id: u32) -> Result<Option<Sale>> {
        self.sales.get(id).await
    }

    /// PromptPay payload for an arbitrary amount, payable to the merchant.
    pub fn promptpay_payload(&self, amount: Decimal) -> Result<Payload> {
        let payload = self.encoder.encode(&self.merchant_phone, amount)?;
        debug!(%amount, checksum = payload.checksum(), "promptpay payload built");
        Ok(payload)
    }

    /// PromptPay payload charging the total of a recorded sale.
    pub async fn sale_payload(&self, sale_id: u32) -> Result<Payload> {
        let sale = self
            .sales
            .get(sale_id)
            .await?
            .ok_or(PosError::SaleNotFound(sale_id))?;
        self.promptpay_payload(sale.total().value())
    }
}
