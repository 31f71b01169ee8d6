//! # Permkit
//!
//! The unified API for permkit: permission holders, chat meta mutation,
//! persistence and audit.
//!
//! ## Overview
//!
//! - **Nodes**: Immutable permission or meta entries with contexts and an optional expiry
//! - **Holders**: Users and groups owning a lock-guarded collection of nodes
//! - **Mutation engine**: Add, exact unset and bulk removal of chat meta
//! - **Service**: Runs a mutation, then audits and saves the holder
//!
//! ## Usage
//!
//! ```rust,no_run
//! use permkit::{CommandOutcome, MetaService, ServiceConfig, TracingAuditSink};
//! use permkit::core::{ChatMetaType, MutableContextSet};
//! use permkit::holder::HolderId;
//! use permkit::store::MemoryStorage;
//!
//! async fn example() {
//!     let service = MetaService::new(MemoryStorage::new(), TracingAuditSink, ServiceConfig::default());
//!     let holder = service.load(&HolderId::user("alice")).await.unwrap();
//!
//!     let mut contexts = MutableContextSet::new();
//!     contexts.add("world", "nether").unwrap();
//!
//!     // Remove every permanent priority-10 prefix set in the nether.
//!     let outcome = service
//!         .remove_chat_meta("console", &holder, ChatMetaType::Prefix, 10, Some("*"), &contexts)
//!         .await
//!         .unwrap();
//!     assert_eq!(outcome, CommandOutcome::Success);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `permkit::core` - Context sets, nodes, chat meta types
//! - `permkit::holder` - Holders and the mutation engine
//! - `permkit::store` - Storage abstraction

pub mod audit;
pub mod config;
pub mod error;
pub mod service;

// Re-export component crates
pub use permkit_core as core;
pub use permkit_holder as holder;
pub use permkit_store as store;

// Re-export main types for convenience
pub use audit::{describe_chat_meta_action, AuditSink, LogEntry, LogEntryBuilder, TracingAuditSink};
pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use service::{CommandOutcome, MetaService};

pub use permkit_core::{ChatMetaType, DataMutateResult, ImmutableContextSet, MutableContextSet, Node};
pub use permkit_holder::{HolderId, MetaTarget, PermissionHolder};

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
