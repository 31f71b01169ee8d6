//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Mutex, PoisonError};

use permkit::{AuditSink, LogEntry, MetaService, ServiceConfig};
use permkit_core::{make_chat_meta_node, ChatMetaType, MutableContextSet, Node};
use permkit_holder::{HolderId, PermissionHolder};
use permkit_store::MemoryStorage;

/// Audit sink that keeps every submitted entry.
#[derive(Debug, Clone, Default)]
pub struct RecordingAuditSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries submitted so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Just the action strings.
    pub fn actions(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.action).collect()
    }
}

impl AuditSink for RecordingAuditSink {
    fn submit(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

/// A service over in-memory storage with a recording audit sink.
pub struct HolderFixture {
    pub service: MetaService<MemoryStorage, RecordingAuditSink>,
    pub audit: RecordingAuditSink,
}

impl HolderFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        let audit = RecordingAuditSink::new();
        Self {
            service: MetaService::new(MemoryStorage::new(), audit.clone(), config),
            audit,
        }
    }

    pub fn storage(&self) -> &MemoryStorage {
        self.service.storage()
    }

    /// A user holder pre-populated with `nodes`.
    pub fn user(&self, name: &str, nodes: Vec<Node>) -> PermissionHolder {
        PermissionHolder::with_nodes(HolderId::user(name), nodes)
    }

    /// A group holder pre-populated with `nodes`.
    pub fn group(&self, name: &str, nodes: Vec<Node>) -> PermissionHolder {
        PermissionHolder::with_nodes(HolderId::group(name), nodes)
    }
}

impl Default for HolderFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a context set from literal pairs.
///
/// Panics on empty keys or values; only meant for literals in tests.
pub fn contexts(pairs: &[(&str, &str)]) -> MutableContextSet {
    match MutableContextSet::from_pairs(pairs.iter().copied()) {
        Ok(set) => set,
        Err(e) => panic!("invalid test contexts {:?}: {}", pairs, e),
    }
}

/// Build a permanent chat meta node.
pub fn meta(meta_type: ChatMetaType, priority: i32, value: &str, ctx: &[(&str, &str)]) -> Node {
    make_chat_meta_node(meta_type, priority, value)
        .with_extra_context(&contexts(ctx))
        .build()
}

/// Build a temporary chat meta node.
pub fn temp_meta(
    meta_type: ChatMetaType,
    priority: i32,
    value: &str,
    ctx: &[(&str, &str)],
    expiry: i64,
) -> Node {
    make_chat_meta_node(meta_type, priority, value)
        .with_extra_context(&contexts(ctx))
        .expiry(expiry)
        .build()
}
