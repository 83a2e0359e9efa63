use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("TLV field {tag} carries {len} characters, at most 99 fit the length prefix")]
    FieldTooLong { tag: String, len: usize },
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Checksum mismatch: payload declares {declared}, computed {computed}")]
    ChecksumMismatch { declared: String, computed: String },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Product {0} not found")]
    ProductNotFound(u32),
    #[error("Sale {0} not found")]
    SaleNotFound(u32),
    #[error("Insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: u32,
        requested: u32,
        available: u32,
    },
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PosError>;
