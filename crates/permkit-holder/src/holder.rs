//! Permission holders.
//!
//! A holder owns the node collection for one subject. The collection is the
//! only shared mutable state in the system, so every access goes through the
//! holder's lock:
//!
//! - Mutations take the write lock for the whole read-modify-write.
//! - Reads take the read lock and clone out what they need.
//!
//! No method holds the lock after returning, so callers can persist a holder
//! right after a mutation without blocking other commands.

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use permkit_core::{ChatMetaEntry, ChatMetaType, DataMutateResult, Node};

/// Kind of subject a holder represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HolderKind {
    User,
    Group,
}

/// Stable identity of a holder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HolderId {
    pub kind: HolderKind,
    pub name: String,
}

impl HolderId {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: HolderKind::User,
            name: name.into(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            kind: HolderKind::Group,
            name: name.into(),
        }
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            HolderKind::User => write!(f, "user:{}", self.name),
            HolderKind::Group => write!(f, "group:{}", self.name),
        }
    }
}

/// A subject owning permission and meta nodes.
#[derive(Debug)]
pub struct PermissionHolder {
    id: HolderId,
    nodes: RwLock<Vec<Node>>,
}

impl PermissionHolder {
    /// Create a holder with no nodes.
    pub fn new(id: HolderId) -> Self {
        Self::with_nodes(id, Vec::new())
    }

    /// Create a holder from previously stored nodes.
    pub fn with_nodes(id: HolderId, nodes: Vec<Node>) -> Self {
        Self {
            id,
            nodes: RwLock::new(nodes),
        }
    }

    pub fn id(&self) -> &HolderId {
        &self.id
    }

    /// The name shown to users.
    pub fn friendly_name(&self) -> &str {
        &self.id.name
    }

    // A panic while holding the lock cannot leave the collection half-written:
    // every mutation computes its result before writing it back in one step.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Node>> {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Node>> {
        self.nodes.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// A consistent snapshot of every node.
    pub fn nodes(&self) -> Vec<Node> {
        self.read().clone()
    }

    pub fn node_count(&self) -> usize {
        self.read().len()
    }

    /// Whether an equal node (ignoring the exact expiry instant) is present.
    pub fn has_permission(&self, node: &Node) -> bool {
        self.read().iter().any(|n| n.almost_equals(node))
    }

    /// Decoded chat meta entries of one type, highest priority first.
    pub fn chat_meta(&self, meta_type: ChatMetaType) -> Vec<ChatMetaEntry> {
        let mut entries: Vec<ChatMetaEntry> = self
            .read()
            .iter()
            .filter_map(|n| meta_type.entry(n).ok())
            .collect();
        entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        entries
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a node unless an equal one already exists.
    pub fn set_permission(&self, node: Node) -> DataMutateResult {
        let mut nodes = self.write();
        if nodes.iter().any(|n| n.almost_equals(&node)) {
            return DataMutateResult::AlreadyHas;
        }

        tracing::debug!(holder = %self.id, key = node.key(), "set node");
        nodes.push(node);
        DataMutateResult::Success
    }

    /// Remove every node equal to `node` (ignoring the exact expiry instant).
    ///
    /// Returns `Fail` and leaves the collection untouched if none exists.
    pub fn unset_permission(&self, node: &Node) -> DataMutateResult {
        let removed = self.remove_if_counted(|n| n.almost_equals(node));
        if removed == 0 {
            return DataMutateResult::Fail;
        }

        tracing::debug!(holder = %self.id, key = node.key(), "unset node");
        DataMutateResult::Success
    }

    /// Remove every node matching `predicate`. Returns whether anything changed.
    pub fn remove_if<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Node) -> bool,
    {
        self.remove_if_counted(predicate) > 0
    }

    /// Remove every node matching `predicate` in one pass under the write lock.
    ///
    /// Returns the number of removed nodes.
    pub fn remove_if_counted<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&Node) -> bool,
    {
        let mut nodes = self.write();
        let kept: Vec<Node> = nodes.iter().filter(|n| !predicate(n)).cloned().collect();
        let removed = nodes.len() - kept.len();
        if removed > 0 {
            *nodes = kept;
        }
        removed
    }

    /// Drop temporary nodes that have expired at `now`.
    pub fn audit_temporary_nodes(&self, now: i64) -> usize {
        let removed = self.remove_if_counted(|n| n.has_expired(now));
        if removed > 0 {
            tracing::debug!(holder = %self.id, removed, "expired temporary nodes");
        }
        removed
    }

    /// Remove every permanent chat meta node of one type.
    pub fn clear_meta(&self, meta_type: ChatMetaType) -> usize {
        self.remove_if_counted(|n| !n.is_temporary() && meta_type.matches(n))
    }

    /// Replace the whole collection at once.
    pub fn replace_nodes(&self, nodes: Vec<Node>) {
        *self.write() = nodes;
    }
}
