use super::money::Money;
use super::product::Product;
use crate::error::{PosError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One requested line of a sale: which product and how many units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: u32,
    pub quantity: u32,
}

/// A validated, not yet settled sale request.
///
/// Lines for the same product are merged into the first occurrence so that
/// each product is checked against its stock exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    lines: Vec<SaleLine>,
}

impl SaleDraft {
    pub fn new(lines: impl IntoIterator<Item = SaleLine>) -> Result<Self> {
        let mut merged: Vec<SaleLine> = Vec::new();
        for line in lines {
            if line.quantity == 0 {
                return Err(PosError::ValidationError(format!(
                    "Quantity for product {} must be positive",
                    line.product_id
                )));
            }
            match merged.iter_mut().find(|l| l.product_id == line.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(
                        || {
                            PosError::ValidationError(format!(
                                "Quantity for product {} overflows",
                                line.product_id
                            ))
                        },
                    )?;
                }
                None => merged.push(line),
            }
        }

        if merged.is_empty() {
            return Err(PosError::ValidationError(
                "A sale needs at least one item".to_string(),
            ));
        }
        Ok(Self { lines: merged })
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    pub fn product_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.iter().map(|l| l.product_id)
    }
}

/// A sold line with the product's price and cost as they were at sale time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: u32,
    pub sale_id: u32,
    pub product_id: u32,
    pub quantity: u32,
    pub price_at_sale: Money,
    pub cost_at_sale: Money,
}

impl SaleItem {
    pub fn subtotal(&self) -> Money {
        self.price_at_sale * self.quantity
    }

    pub fn cost(&self) -> Money {
        self.cost_at_sale * self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<SaleItem>,
}

impl Sale {
    /// Amount charged to the customer.
    pub fn total(&self) -> Money {
        self.items.iter().map(SaleItem::subtotal).sum()
    }

    pub fn cost(&self) -> Money {
        self.items.iter().map(SaleItem::cost).sum()
    }

    pub fn profit(&self) -> Money {
        self.total() - self.cost()
    }
}

/// Settles `draft` against `products`.
///
/// Every line is checked before any stock moves: on error `products` is left
/// untouched. On success stock is deducted and the sale items are returned,
/// numbered from `first_item_id`.
pub fn settle(
    draft: &SaleDraft,
    products: &mut HashMap<u32, Product>,
    sale_id: u32,
    first_item_id: u32,
) -> Result<Vec<SaleItem>> {
    for line in draft.lines() {
        let product = products
            .get(&line.product_id)
            .ok_or(PosError::ProductNotFound(line.product_id))?;
        if product.quantity < line.quantity {
            return Err(PosError::InsufficientStock {
                product: product.id,
                requested: line.quantity,
                available: product.quantity,
            });
        }
    }

    let mut items = Vec::with_capacity(draft.lines().len());
    for (item_id, line) in (first_item_id..).zip(draft.lines()) {
        let product = products
            .get_mut(&line.product_id)
            .ok_or(PosError::ProductNotFound(line.product_id))?;
        product.deduct_stock(line.quantity)?;
        items.push(SaleItem {
            id: item_id,
            sale_id,
            product_id: product.id,
            quantity: line.quantity,
            price_at_sale: product.price,
            cost_at_sale: product.cost,
        });
    }
    Ok(items)
}
