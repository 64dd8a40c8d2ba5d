//! Domain error types.

use thiserror::Error;

/// Errors that can occur when constructing or mutating domain objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required text field was missing or blank.
    #[error("{name} is required")]
    BlankField { name: &'static str },

    /// A minutes delta was zero or negative.
    #[error("minutes must be positive, got {0}")]
    NonPositiveMinutes(i64),

    /// A month-of-year outside 1..=12.
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    /// An action type outside ADD/DELETE.
    #[error("unsupported action type: {0}")]
    UnsupportedAction(String),
}
