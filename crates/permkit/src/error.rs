//! Error types for the service layer.

use permkit_holder::HolderId;
use permkit_store::StoreError;
use thiserror::Error;

/// Errors that can occur during service operations.
///
/// Negative mutation outcomes ("holder lacks this meta") are not errors; they
/// come back as [`CommandOutcome::StateError`](crate::CommandOutcome).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The in-memory change was applied but could not be persisted.
    #[error("failed to save {holder}: {source}")]
    SaveFailed {
        holder: HolderId,
        #[source]
        source: StoreError,
    },
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
