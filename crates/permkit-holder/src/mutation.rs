//! The chat meta mutation engine.
//!
//! Removal comes in two modes, picked by the caller's target argument:
//!
//! - **Bulk**: `"null"` (any case) or `"*"` removes every permanent entry of
//!   the given type and priority whose contexts equal the target contexts
//!   exactly. Always reports `Success`, even if nothing matched.
//! - **Exact**: any other value builds one fully specified node and unsets it.
//!   Reports `Fail` if the holder did not have it.
//!
//! The engine keeps no state between calls. Each call is one transaction
//! against the holder's node collection.

use permkit_core::{
    make_chat_meta_node, ChatMetaType, DataMutateResult, ImmutableContextSet, MutableContextSet,
    Node,
};

use crate::holder::PermissionHolder;

/// What a removal targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaTarget {
    /// Every entry in the (type, priority, contexts) slot.
    All,
    /// One entry with this exact value.
    Exact(String),
}

impl MetaTarget {
    /// Parse a caller argument. `"null"` (any case) and `"*"` select [`MetaTarget::All`].
    pub fn parse(arg: &str) -> Self {
        if arg.eq_ignore_ascii_case("null") || arg == "*" {
            MetaTarget::All
        } else {
            MetaTarget::Exact(arg.to_string())
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, MetaTarget::All)
    }
}

/// Result of a removal, with the number of nodes it removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub result: DataMutateResult,
    pub removed: usize,
}

/// Whether `node` sits in the bulk removal slot `(meta_type, priority, contexts)`.
pub fn matches_slot(
    node: &Node,
    meta_type: ChatMetaType,
    priority: i32,
    contexts: &ImmutableContextSet,
) -> bool {
    match meta_type.decode(node) {
        Ok((p, _)) => p == priority && !node.is_temporary() && node.contexts() == contexts,
        Err(_) => false,
    }
}

/// Remove every permanent `meta_type` node at `priority` with exactly `contexts`.
///
/// Always succeeds; `removed` may be zero.
pub fn bulk_remove_chat_meta(
    holder: &PermissionHolder,
    meta_type: ChatMetaType,
    priority: i32,
    contexts: &MutableContextSet,
) -> RemovalOutcome {
    let target = contexts.make_immutable();
    let removed = holder.remove_if_counted(|n| matches_slot(n, meta_type, priority, &target));

    tracing::debug!(
        holder = %holder.id(),
        meta_type = meta_type.name(),
        priority,
        contexts = %target,
        removed,
        "bulk removed chat meta"
    );

    RemovalOutcome {
        result: DataMutateResult::Success,
        removed,
    }
}

/// Remove the single `meta_type` node `(priority, value, contexts)`.
pub fn unset_chat_meta(
    holder: &PermissionHolder,
    meta_type: ChatMetaType,
    priority: i32,
    value: &str,
    contexts: &MutableContextSet,
) -> RemovalOutcome {
    let node = make_chat_meta_node(meta_type, priority, value)
        .with_extra_context(contexts)
        .build();

    let result = holder.unset_permission(&node);
    RemovalOutcome {
        result,
        removed: usize::from(result.as_bool()),
    }
}

/// Remove chat meta in the mode selected by `target`.
pub fn remove_chat_meta(
    holder: &PermissionHolder,
    meta_type: ChatMetaType,
    priority: i32,
    target: &MetaTarget,
    contexts: &MutableContextSet,
) -> RemovalOutcome {
    match target {
        MetaTarget::All => bulk_remove_chat_meta(holder, meta_type, priority, contexts),
        MetaTarget::Exact(value) => unset_chat_meta(holder, meta_type, priority, value, contexts),
    }
}

/// Add a permanent chat meta node.
pub fn add_chat_meta(
    holder: &PermissionHolder,
    meta_type: ChatMetaType,
    priority: i32,
    value: &str,
    contexts: &MutableContextSet,
) -> DataMutateResult {
    let node = make_chat_meta_node(meta_type, priority, value)
        .with_extra_context(contexts)
        .build();
    holder.set_permission(node)
}

/// Add a chat meta node that expires at `expiry` (Unix milliseconds).
pub fn add_temp_chat_meta(
    holder: &PermissionHolder,
    meta_type: ChatMetaType,
    priority: i32,
    value: &str,
    contexts: &MutableContextSet,
    expiry: i64,
) -> DataMutateResult {
    let node = make_chat_meta_node(meta_type, priority, value)
        .with_extra_context(contexts)
        .expiry(expiry)
        .build();
    holder.set_permission(node)
}
