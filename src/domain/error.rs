//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid rules supplied by the user.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid header source '{source_name}': {reason}")]
    InvalidHeaderSource { source_name: String, reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
