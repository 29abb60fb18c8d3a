use thiserror::Error;

use super::ProductId;

/// Errors raised inside a cart operation before it is downgraded to a notification
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Product not in cart: {product_id}")]
    NotInCart { product_id: ProductId },

    #[error("Out of stock: product_id={product_id}, requested={requested}, available={available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: i64 },

    #[error("Lookup error: {source}")]
    Lookup {
        #[from]
        source: LookupError,
    },

    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: StorageError,
    },
}

/// Errors from the product/stock lookup service
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    #[error("Unexpected status {status} from {path}")]
    Status { status: u16, path: String },

    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Malformed response from {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid lookup URL: {message}")]
    InvalidUrl { message: String },
}

/// Errors from the durable storage port
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

/// Result type alias for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
