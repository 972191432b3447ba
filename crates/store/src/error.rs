use thiserror::Error;

/// Errors that can occur when committing a write plan or reading rows.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert hit an existing key.
    #[error("Duplicate key in {table}: {key}")]
    DuplicateKey { table: &'static str, key: String },

    /// An update targeted a row that does not exist.
    #[error("Row not found in {table}: {key}")]
    RowNotFound { table: &'static str, key: String },

    /// An update carried no columns to write.
    #[error("Update of {table}:{key} has no columns")]
    EmptyUpdate { table: &'static str, key: String },

    /// The commit was aborted before anything was written.
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
