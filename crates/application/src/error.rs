//! Application error taxonomy.

use domain::DomainError;
use thiserror::Error;
use workload_store::StoreError;

/// Errors surfaced by command and query processing.
///
/// The taxonomy decides how the consumer reacts: validation and
/// unsupported-action failures are never retried, transient store failures
/// are retried with bounded backoff before dead-lettering.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required field was missing, blank, or out of range.
    #[error("validation failed: {0}")]
    Validation(DomainError),

    /// Query for a trainer with no persisted workload.
    #[error("trainer not found: {0}")]
    NotFound(String),

    /// An action type outside ADD/DELETE.
    #[error("unsupported action type: {0}")]
    UnsupportedAction(String),

    /// A failure from the backing store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnsupportedAction(action) => AppError::UnsupportedAction(action),
            other => AppError::Validation(other),
        }
    }
}

impl AppError {
    /// Whether redelivering the same input could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Store(err) if err.is_transient())
    }
}
