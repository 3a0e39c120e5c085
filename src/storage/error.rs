//! Storage error types.

use thiserror::Error;

/// Errors surfaced by an [`ObjectStore`](super::ObjectStore).
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    /// Network failures, throttling and 5xx responses from the store.
    #[error("transient store error: {0}")]
    Transient(String),

    #[error("store request timed out: {0}")]
    Timeout(String),

    /// Permission, missing bucket or configuration problems. Retrying will not help.
    #[error("fatal store error: {0}")]
    Fatal(String),
}

impl StorageError {
    /// Whether a single bounded retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Transient(_) | StorageError::Timeout(_))
    }

    /// Short label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            StorageError::NotFound(_) => "not_found",
            StorageError::Transient(_) => "transient",
            StorageError::Timeout(_) => "timeout",
            StorageError::Fatal(_) => "fatal",
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
