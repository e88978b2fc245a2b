//! Error types for Craftwork.

use thiserror::Error;

/// Top-level error type for Craftwork operations.
#[derive(Debug, Error)]
pub enum CraftworkError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Version string could not be parsed
    #[error("Invalid schema version: {0:?}")]
    InvalidVersion(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Result type alias for Craftwork operations.
pub type CraftworkResult<T> = Result<T, CraftworkError>;
