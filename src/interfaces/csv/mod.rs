//! CSV adapters for batch processing: product and sale readers, inventory writer.

pub mod inventory_writer;
pub mod product_reader;
pub mod sale_reader;
