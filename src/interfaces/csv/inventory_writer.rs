use crate::domain::product::Product;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct InventoryRecord<'a> {
    id: u32,
    name: &'a str,
    price: String,
    cost: String,
    quantity: u32,
}

/// Writes the stock report as CSV: `id,name,price,cost,quantity`.
///
/// Money columns always carry two fractional digits.
pub struct InventoryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> InventoryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_products(&mut self, products: &[Product]) -> Result<()> {
        if products.is_empty() {
            self.writer
                .write_record(["id", "name", "price", "cost", "quantity"])?;
        }
        for product in products {
            self.writer.serialize(InventoryRecord {
                id: product.id,
                name: &product.name,
                price: product.price.to_string(),
                cost: product.cost.to_string(),
                quantity: product.quantity,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
