//! # Permkit Core
//!
//! Pure primitives for permkit: context sets, nodes, and chat meta encoding.
//!
//! This crate contains no I/O and no locking. It is value types and pure
//! functions over them.
//!
//! ## Key Types
//!
//! - [`MutableContextSet`] / [`ImmutableContextSet`] - Where a node applies
//! - [`Node`] - A single permission or meta entry
//! - [`ChatMetaType`] - Prefix/suffix matcher and decoder
//! - [`DataMutateResult`] - Outcome of a holder mutation
//!
//! ## Chat Meta Encoding
//!
//! Chat meta nodes encode `(type, priority, value)` in their key as
//! `<type>.<priority>.<value>`, with `\` and `.` escaped in the value.
//! See [`make_chat_meta_node`].

pub mod chat_meta;
pub mod context;
pub mod error;
pub mod node;
pub mod result;

pub use chat_meta::{ChatMetaEntry, ChatMetaType};
pub use context::{ImmutableContextSet, MutableContextSet};
pub use error::{CoreError, Result};
pub use node::{make_chat_meta_node, Node, NodeBuilder};
pub use result::DataMutateResult;
