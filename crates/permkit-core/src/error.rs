//! Error types for permkit core.

use thiserror::Error;

/// Core errors that can occur while building or decoding nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid context entry {key:?}={value:?}: {reason}")]
    InvalidContext {
        key: String,
        value: String,
        reason: &'static str,
    },

    #[error("node {0:?} is not a {1} node")]
    NotChatMeta(String, &'static str),

    #[error("invalid chat meta priority in {0:?}")]
    InvalidPriority(String),

    #[error("unknown chat meta type: {0}")]
    UnknownMetaType(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
