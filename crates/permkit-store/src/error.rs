//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend is unavailable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
