use domain::DomainError;
use thiserror::Error;

/// Errors that can occur when interacting with a workload store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A relational database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document store error occurred.
    #[error("document store error: {0}")]
    Document(#[from] mongodb::error::Error),

    /// A database migration error occurred.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A persisted record could not be mapped back to the domain model.
    #[error("corrupt stored record: {0}")]
    Corrupt(#[from] DomainError),
}

impl StoreError {
    /// Whether a retry against the backing store could plausibly succeed.
    ///
    /// I/O failures are transient; a record that fails domain validation on
    /// load will fail identically on every retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Database(_) | StoreError::Document(_))
    }
}

/// Result type for workload store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
