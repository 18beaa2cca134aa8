//! Error Handling
//!
//! Unified error types for the memory engine.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Store-wide error type
#[derive(Error, Debug)]
pub enum StoreError {
    /// Create on an existing user without overwrite
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Fetch/patch on a missing user
    #[error("Not found: {0}")]
    NotFound(String),

    /// Both the primary datastore and its backup are unreadable.
    /// Distinct from NotFound: this indicates data loss, not absence.
    #[error("Recovery failure: {0}")]
    RecoveryFailure(String),

    /// Backup snapshot could not be written; fatal for the current operation
    #[error("Backup error: {0}")]
    Backup(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for store errors
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a recovery failure error
    pub fn recovery_failure(msg: impl Into<String>) -> Self {
        Self::RecoveryFailure(msg.into())
    }

    /// Create a backup error
    pub fn backup(msg: impl Into<String>) -> Self {
        Self::Backup(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert StoreError to a string suitable for API responses
impl From<StoreError> for String {
    fn from(err: StoreError) -> String {
        err.to_string()
    }
}
