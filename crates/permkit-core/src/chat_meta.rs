//! Chat meta types: prefixes and suffixes.
//!
//! Each variant owns a row in a small capability table holding its namespace.
//! Matching and decoding are pure functions over a [`Node`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::node::{escape_delimiters, unescape_delimiters, Node};

/// A chat display meta type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatMetaType {
    Prefix,
    Suffix,
}

/// Per-variant behaviour.
struct Capability {
    name: &'static str,
    /// `name` followed by the key delimiter.
    namespace: &'static str,
}

static CAPABILITIES: [Capability; 2] = [
    Capability {
        name: "prefix",
        namespace: "prefix.",
    },
    Capability {
        name: "suffix",
        namespace: "suffix.",
    },
];

/// A decoded chat meta entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatMetaEntry {
    pub priority: i32,
    pub value: String,
}

impl ChatMetaType {
    /// All variants.
    pub const ALL: [ChatMetaType; 2] = [ChatMetaType::Prefix, ChatMetaType::Suffix];

    fn capability(self) -> &'static Capability {
        match self {
            ChatMetaType::Prefix => &CAPABILITIES[0],
            ChatMetaType::Suffix => &CAPABILITIES[1],
        }
    }

    /// Lower-case name, e.g. `"prefix"`.
    pub fn name(self) -> &'static str {
        self.capability().name
    }

    /// Whether `node` is a well-formed node of this type.
    pub fn matches(self, node: &Node) -> bool {
        self.decode(node).is_ok()
    }

    /// Extract `(priority, value)` from a node of this type.
    pub fn decode(self, node: &Node) -> Result<(i32, String)> {
        self.decode_key(node.key())
    }

    /// Extract `(priority, value)` from a raw permission key.
    pub fn decode_key(self, key: &str) -> Result<(i32, String)> {
        let not_meta = || CoreError::NotChatMeta(key.to_string(), self.name());

        let namespace = self.capability().namespace;
        let head = key.get(..namespace.len()).ok_or_else(not_meta)?;
        if !head.eq_ignore_ascii_case(namespace) {
            return Err(not_meta());
        }

        let rest = &key[namespace.len()..];
        let (priority, value) = rest.split_once('.').ok_or_else(not_meta)?;
        let priority = priority
            .parse::<i32>()
            .map_err(|_| CoreError::InvalidPriority(key.to_string()))?;

        Ok((priority, unescape_delimiters(value)))
    }

    /// The key a chat meta node of this type is stored under.
    pub fn encode_key(self, priority: i32, value: &str) -> String {
        format!("{}.{}.{}", self.name(), priority, escape_delimiters(value))
    }

    /// Like [`decode`](Self::decode), returning a named entry.
    pub fn entry(self, node: &Node) -> Result<ChatMetaEntry> {
        let (priority, value) = self.decode(node)?;
        Ok(ChatMetaEntry { priority, value })
    }
}

impl fmt::Display for ChatMetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChatMetaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        ChatMetaType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownMetaType(s.to_string()))
    }
}
