use common::ProductId;
use domain::ProductError;
use store::StoreError;
use thiserror::Error;

/// Errors returned by catalog use cases.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A business rule or input check failed.
    #[error(transparent)]
    Product(#[from] ProductError),

    #[error("product not found: {product_id}")]
    NotFound { product_id: ProductId },

    /// The commit or a read failed; nothing was written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored row could not be turned back into a domain value.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::Store(StoreError::Database(e))
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
