use crate::domain::product::NewProduct;
use crate::error::{PosError, Result};
use std::io::Read;

/// Reads products to create from a CSV source.
///
/// Expected header: `name,price,cost,quantity,description`. The description
/// column may be empty or absent. Whitespace around fields is trimmed.
pub struct ProductReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ProductReader<R> {
    /// Creates a new `ProductReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes products.
    pub fn products(self) -> impl Iterator<Item = Result<NewProduct>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PosError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "name, price, cost, quantity, description\n\
                    Green curry, 80.00, 32.50, 10, spicy\n\
                    Sticky rice, 20, 5, 40,";
        let reader = ProductReader::new(data.as_bytes());
        let results: Vec<Result<NewProduct>> = reader.products().collect();

        assert_eq!(results.len(), 2);
        let curry = results[0].as_ref().unwrap();
        assert_eq!(curry.name, "Green curry");
        assert_eq!(curry.price, Money::new(dec!(80.00)));
        assert_eq!(curry.cost, Money::new(dec!(32.50)));
        assert_eq!(curry.quantity, 10);
        assert_eq!(curry.description.as_deref(), Some("spicy"));

        let rice = results[1].as_ref().unwrap();
        assert_eq!(rice.description, None);
    }

    #[test]
    fn test_reader_missing_description_column() {
        let data = "name,price,cost,quantity\nMango,45,20,3";
        let reader = ProductReader::new(data.as_bytes());
        let results: Vec<Result<NewProduct>> = reader.products().collect();

        assert_eq!(results[0].as_ref().unwrap().description, None);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "name,price,cost,quantity,description\nMango,cheap,20,3,\nMango,45,20,-3,";
        let reader = ProductReader::new(data.as_bytes());
        let results: Vec<Result<NewProduct>> = reader.products().collect();

        assert!(results[0].is_err());
        assert!(results[1].is_err());
    }
}
