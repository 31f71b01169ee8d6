//! # Permkit Holder
//!
//! Permission holders and the chat meta mutation engine.
//!
//! ## Overview
//!
//! A [`PermissionHolder`] owns the nodes of one user or group behind a
//! read/write lock. The [`mutation`] module implements the add, unset and
//! bulk-remove algorithms over a holder and reports each outcome as a
//! [`DataMutateResult`](permkit_core::DataMutateResult).
//!
//! ## Usage
//!
//! ```rust
//! use permkit_core::{ChatMetaType, DataMutateResult, MutableContextSet};
//! use permkit_holder::{add_chat_meta, remove_chat_meta, HolderId, MetaTarget, PermissionHolder};
//!
//! let holder = PermissionHolder::new(HolderId::user("alice"));
//! let global = MutableContextSet::new();
//!
//! add_chat_meta(&holder, ChatMetaType::Prefix, 10, "[Admin]", &global);
//!
//! let outcome = remove_chat_meta(
//!     &holder,
//!     ChatMetaType::Prefix,
//!     10,
//!     &MetaTarget::parse("*"),
//!     &global,
//! );
//! assert_eq!(outcome.result, DataMutateResult::Success);
//! assert_eq!(holder.node_count(), 0);
//! ```

pub mod holder;
pub mod mutation;

pub use holder::{HolderId, HolderKind, PermissionHolder};
pub use mutation::{
    add_chat_meta, add_temp_chat_meta, bulk_remove_chat_meta, matches_slot, remove_chat_meta,
    unset_chat_meta, MetaTarget, RemovalOutcome,
};
