//! Nodes: single permission or meta entries owned by a holder.
//!
//! A node is immutable once built. Holders replace or remove nodes, they never
//! edit them in place.

use serde::{Deserialize, Serialize};

use crate::chat_meta::ChatMetaType;
use crate::context::{ImmutableContextSet, MutableContextSet};

/// A permission or meta entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawNode")]
pub struct Node {
    /// The permission key. Chat meta nodes encode type, priority and value here.
    key: String,

    /// Whether the permission is granted (`true`) or negated (`false`).
    value: bool,

    /// Where this node applies.
    contexts: ImmutableContextSet,

    /// When the node expires (Unix milliseconds). `None` means permanent.
    expiry: Option<i64>,
}

impl Node {
    /// Start building a node for the given key.
    pub fn builder(key: impl Into<String>) -> NodeBuilder {
        NodeBuilder::new(key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn contexts(&self) -> &ImmutableContextSet {
        &self.contexts
    }

    pub fn expiry(&self) -> Option<i64> {
        self.expiry
    }

    /// Whether this node carries an expiry.
    pub fn is_temporary(&self) -> bool {
        self.expiry.is_some()
    }

    /// Whether this node is temporary and past its expiry at `now`.
    pub fn has_expired(&self, now: i64) -> bool {
        matches!(self.expiry, Some(at) if at <= now)
    }

    /// Equality ignoring the exact expiry instant.
    ///
    /// Two temporary nodes with different expiry times are considered the
    /// same entry; a temporary and a permanent node never are.
    pub fn almost_equals(&self, other: &Node) -> bool {
        self.key == other.key
            && self.value == other.value
            && self.is_temporary() == other.is_temporary()
            && self.contexts == other.contexts
    }

    /// A builder seeded with this node's fields.
    pub fn to_builder(&self) -> NodeBuilder {
        NodeBuilder {
            key: self.key.clone(),
            value: self.value,
            contexts: self.contexts.mutable_copy(),
            expiry: self.expiry,
        }
    }
}

/// Builder for [`Node`].
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    key: String,
    value: bool,
    contexts: MutableContextSet,
    expiry: Option<i64>,
}

impl NodeBuilder {
    /// Create a builder for a granted, permanent, global node.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: true,
            contexts: MutableContextSet::new(),
            expiry: None,
        }
    }

    /// Set the node's value.
    pub fn value(mut self, value: bool) -> Self {
        self.value = value;
        self
    }

    /// Make the node temporary, expiring at `expiry` (Unix milliseconds).
    pub fn expiry(mut self, expiry: i64) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Clear any expiry.
    pub fn permanent(mut self) -> Self {
        self.expiry = None;
        self
    }

    /// Merge extra contexts into the node.
    pub fn with_extra_context(mut self, contexts: &MutableContextSet) -> Self {
        self.contexts.add_all(&contexts.make_immutable());
        self
    }

    /// Merge an immutable context snapshot into the node.
    pub fn with_contexts(mut self, contexts: &ImmutableContextSet) -> Self {
        self.contexts.add_all(contexts);
        self
    }

    /// Finish the node. Keys that decode as chat meta are rewritten to the
    /// form [`make_chat_meta_node`] produces, so `PREFIX.05.x` and
    /// `prefix.5.x` name the same entry.
    pub fn build(self) -> Node {
        Node {
            key: canonical_key(self.key),
            value: self.value,
            contexts: self.contexts.make_immutable(),
            expiry: self.expiry,
        }
    }
}

/// Deserialized form of [`Node`], passed back through the builder.
#[derive(Deserialize)]
struct RawNode {
    key: String,
    value: bool,
    contexts: ImmutableContextSet,
    expiry: Option<i64>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        NodeBuilder {
            key: raw.key,
            value: raw.value,
            contexts: raw.contexts.mutable_copy(),
            expiry: raw.expiry,
        }
        .build()
    }
}

fn canonical_key(key: String) -> String {
    ChatMetaType::ALL
        .into_iter()
        .find_map(|t| {
            t.decode_key(&key)
                .ok()
                .map(|(priority, value)| t.encode_key(priority, &value))
        })
        .unwrap_or(key)
}

/// Build a chat meta node for `(meta_type, priority, value)`.
///
/// The key is `<type>.<priority>.<escaped value>`. Callers add contexts and
/// expiry through the returned builder.
pub fn make_chat_meta_node(meta_type: ChatMetaType, priority: i32, value: &str) -> NodeBuilder {
    NodeBuilder::new(meta_type.encode_key(priority, value))
}

/// Escape `\` and `.` so a meta value cannot break the key layout.
pub fn escape_delimiters(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == '.' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inverse of [`escape_delimiters`]. A trailing lone `\` is kept as-is.
pub fn unescape_delimiters(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let node = Node::builder("some.permission").build();

        assert_eq!(node.key(), "some.permission");
        assert!(node.value());
        assert!(node.contexts().is_empty());
        assert!(!node.is_temporary());
    }

    #[test]
    fn test_with_extra_context_merges() {
        let ctx = MutableContextSet::from_pairs([("world", "nether")]).unwrap();
        let node = Node::builder("a")
            .with_contexts(&ImmutableContextSet::from_pairs([("server", "lobby")]).unwrap())
            .with_extra_context(&ctx)
            .build();

        assert_eq!(node.contexts().len(), 2);
        assert!(node.contexts().contains("world", "nether"));
    }

    #[test]
    fn test_chat_meta_key_layout() {
        let node = make_chat_meta_node(ChatMetaType::Prefix, 10, "&c[Admin] v1.2").build();
        assert_eq!(node.key(), "prefix.10.&c[Admin] v1\\.2");
    }

    #[test]
    fn test_escape_roundtrip_awkward_values() {
        for value in ["", ".", "\\", "a.b\\c", "\\.", "trailing\\"] {
            assert_eq!(unescape_delimiters(&escape_delimiters(value)), value);
        }
    }

    #[test]
    fn test_almost_equals_ignores_expiry_instant() {
        let a = Node::builder("x").expiry(1000).build();
        let b = Node::builder("x").expiry(2000).build();
        let permanent = Node::builder("x").build();

        assert!(a.almost_equals(&b));
        assert_ne!(a, b);
        assert!(!a.almost_equals(&permanent));
    }

    #[test]
    fn test_almost_equals_checks_context() {
        let global = Node::builder("x").build();
        let scoped = Node::builder("x")
            .with_contexts(&ImmutableContextSet::from_pairs([("world", "nether")]).unwrap())
            .build();

        assert!(!global.almost_equals(&scoped));
    }

    #[test]
    fn test_loose_chat_meta_key_is_normalised() {
        let loose = Node::builder("PREFIX.05.x").build();
        let made = make_chat_meta_node(ChatMetaType::Prefix, 5, "x").build();

        assert_eq!(loose.key(), "prefix.5.x");
        assert!(loose.almost_equals(&made));
        assert_eq!(Node::builder("Suffix.+2.a.b").build().key(), "suffix.2.a\\.b");
        assert_eq!(Node::builder("Essentials.Fly").build().key(), "Essentials.Fly");
    }

    #[test]
    fn test_deserialize_normalises_key() {
        let json = r#"{"key":"Prefix.007.p","value":true,"contexts":{"pairs":[]},"expiry":null}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.key(), "prefix.7.p");
    }

    #[test]
    fn test_has_expired() {
        let node = Node::builder("x").expiry(1000).build();
        assert!(!node.has_expired(999));
        assert!(node.has_expired(1000));
        assert!(!Node::builder("x").build().has_expired(i64::MAX));
    }

    #[test]
    fn test_to_builder_preserves_fields() {
        let node = make_chat_meta_node(ChatMetaType::Suffix, 3, "s")
            .value(false)
            .expiry(55)
            .build();
        assert_eq!(node.to_builder().build(), node);
    }

    #[test]
    fn test_node_json_roundtrip() {
        let node = make_chat_meta_node(ChatMetaType::Prefix, 1, "p")
            .with_contexts(&ImmutableContextSet::from_pairs([("world", "end")]).unwrap())
            .build();
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
