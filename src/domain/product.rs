use super::money::Money;
use crate::error::{PosError, Result};
use serde::{Deserialize, Serialize};

/// A product as submitted for creation, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub cost: Money,
    pub quantity: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PosError::ValidationError(
                "Product name must not be blank".to_string(),
            ));
        }
        if self.price.is_negative() {
            return Err(PosError::ValidationError(format!(
                "Product {:?} has a negative price",
                self.name
            )));
        }
        if self.cost.is_negative() {
            return Err(PosError::ValidationError(format!(
                "Product {:?} has a negative cost",
                self.name
            )));
        }
        Ok(())
    }

    pub fn with_id(self, id: u32) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            price: self.price,
            cost: self.cost,
            quantity: self.quantity,
            description: self.description.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    /// Selling price.
    pub price: Money,
    /// Supplier price.
    pub cost: Money,
    /// Units in stock.
    pub quantity: u32,
    pub description: Option<String>,
}

impl Product {
    /// Removes `quantity` units from stock, refusing to go below zero.
    pub fn deduct_stock(&mut self, quantity: u32) -> Result<()> {
        match self.quantity.checked_sub(quantity) {
            Some(remaining) => {
                self.quantity = remaining;
                Ok(())
            }
            None => Err(PosError::InsufficientStock {
                product: self.id,
                requested: quantity,
                available: self.quantity,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn coffee() -> NewProduct {
        NewProduct {
            name: " Iced coffee ".to_string(),
            price: Money::new(dec!(45.00)),
            cost: Money::new(dec!(18.50)),
            quantity: 10,
            description: Some(" ".to_string()),
        }
    }

    #[test]
    fn test_new_product_validation() {
        assert!(coffee().validate().is_ok());

        let mut blank = coffee();
        blank.name = "  ".to_string();
        assert!(matches!(blank.validate(), Err(PosError::ValidationError(_))));

        let mut negative = coffee();
        negative.price = Money::new(dec!(-1));
        assert!(matches!(
            negative.validate(),
            Err(PosError::ValidationError(_))
        ));

        let mut negative_cost = coffee();
        negative_cost.cost = Money::new(dec!(-0.01));
        assert!(negative_cost.validate().is_err());
    }

    #[test]
    fn test_with_id_tidies_fields() {
        let product = coffee().with_id(7);
        assert_eq!(product.id, 7);
        assert_eq!(product.name, "Iced coffee");
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_deduct_stock() {
        let mut product = coffee().with_id(1);
        product.deduct_stock(4).unwrap();
        assert_eq!(product.quantity, 6);
        product.deduct_stock(6).unwrap();
        assert_eq!(product.quantity, 0);
    }

    #[test]
    fn test_deduct_stock_insufficient() {
        let mut product = coffee().with_id(3);
        let result = product.deduct_stock(11);
        assert!(matches!(
            result,
            Err(PosError::InsufficientStock {
                product: 3,
                requested: 11,
                available: 10
            })
        ));
        assert_eq!(product.quantity, 10);
    }
}
