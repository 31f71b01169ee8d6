//! Context sets.
//!
//! A context set is an unordered multimap of string keys to string values
//! describing where a node applies (`world=nether`, `server=survival`, ...).
//! An empty set means "global".
//!
//! Two flavours exist:
//!
//! - [`MutableContextSet`] is built up by the caller from parsed arguments.
//! - [`ImmutableContextSet`] is a value snapshot used for comparison and
//!   stored inside every [`Node`](crate::Node).
//!
//! Snapshots are plain values. Mutating the source set after taking a
//! snapshot never changes the snapshot.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A single normalised `(key, value)` pair.
type Pair = (String, String);

fn normalise(key: &str, value: &str) -> Result<Pair> {
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() {
        return Err(CoreError::InvalidContext {
            key: key.to_string(),
            value: value.to_string(),
            reason: "key is empty",
        });
    }
    if value.is_empty() {
        return Err(CoreError::InvalidContext {
            key: key.to_string(),
            value: value.to_string(),
            reason: "value is empty",
        });
    }

    Ok((key.to_lowercase(), value.to_string()))
}

fn fmt_pairs(pairs: &BTreeSet<Pair>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if pairs.is_empty() {
        return write!(f, "global");
    }
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={}", k, v)?;
    }
    Ok(())
}

/// A mutable context set, usually assembled per command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutableContextSet {
    pairs: BTreeSet<Pair>,
}

impl MutableContextSet {
    /// Create an empty (global) context set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an iterator of pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut set = Self::new();
        for (k, v) in pairs {
            set.add(k.as_ref(), v.as_ref())?;
        }
        Ok(set)
    }

    /// Add a pair. Adding an existing pair is a no-op.
    pub fn add(&mut self, key: &str, value: &str) -> Result<()> {
        self.pairs.insert(normalise(key, value)?);
        Ok(())
    }

    /// Add every pair of another set.
    pub fn add_all(&mut self, other: &ImmutableContextSet) {
        self.pairs.extend(other.pairs.iter().cloned());
    }

    /// Remove a single pair. Returns true if it was present.
    pub fn remove(&mut self, key: &str, value: &str) -> bool {
        match normalise(key, value) {
            Ok(pair) => self.pairs.remove(&pair),
            Err(_) => false,
        }
    }

    /// Remove every value stored under `key`.
    pub fn remove_all(&mut self, key: &str) {
        let key = key.trim().to_lowercase();
        self.pairs.retain(|(k, _)| *k != key);
    }

    /// Take a value snapshot of this set.
    pub fn make_immutable(&self) -> ImmutableContextSet {
        ImmutableContextSet {
            pairs: self.pairs.clone(),
        }
    }

    /// Whether the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the set holds the exact pair.
    pub fn contains(&self, key: &str, value: &str) -> bool {
        normalise(key, value)
            .map(|pair| self.pairs.contains(&pair))
            .unwrap_or(false)
    }

    /// Iterate over pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for MutableContextSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pairs(&self.pairs, f)
    }
}

/// An immutable context set snapshot.
///
/// Equality, ordering and hashing are defined over the pair set only.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImmutableContextSet {
    pairs: BTreeSet<Pair>,
}

impl ImmutableContextSet {
    /// The empty (global) context set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot directly from pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(MutableContextSet::from_pairs(pairs)?.make_immutable())
    }

    /// Snapshots are already immutable; this returns a copy so callers can
    /// treat both flavours the same way.
    pub fn make_immutable(&self) -> ImmutableContextSet {
        self.clone()
    }

    /// Copy into a fresh mutable set.
    pub fn mutable_copy(&self) -> MutableContextSet {
        MutableContextSet {
            pairs: self.pairs.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn contains(&self, key: &str, value: &str) -> bool {
        normalise(key, value)
            .map(|pair| self.pairs.contains(&pair))
            .unwrap_or(false)
    }

    /// Every value stored under `key`.
    pub fn values(&self, key: &str) -> Vec<&str> {
        let key = key.trim().to_lowercase();
        self.pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ImmutableContextSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pairs(&self.pairs, f)
    }
}

impl From<&MutableContextSet> for ImmutableContextSet {
    fn from(set: &MutableContextSet) -> Self {
        set.make_immutable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_irrelevant() {
        let a = MutableContextSet::from_pairs([("world", "nether"), ("server", "lobby")]).unwrap();
        let b = MutableContextSet::from_pairs([("server", "lobby"), ("world", "nether")]).unwrap();

        assert_eq!(a.make_immutable(), b.make_immutable());
    }

    #[test]
    fn test_snapshot_unaffected_by_later_mutation() {
        let mut set = MutableContextSet::from_pairs([("world", "nether")]).unwrap();
        let snapshot = set.make_immutable();

        set.add("server", "lobby").unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_ne!(snapshot, set.make_immutable());
    }

    #[test]
    fn test_keys_are_normalised() {
        let a = ImmutableContextSet::from_pairs([(" World ", "nether")]).unwrap();
        let b = ImmutableContextSet::from_pairs([("world", "nether")]).unwrap();
        assert_eq!(a, b);

        // Values keep their case.
        let c = ImmutableContextSet::from_pairs([("world", "Nether")]).unwrap();
        assert_ne!(b, c);
    }

    #[test]
    fn test_multimap_values() {
        let set = ImmutableContextSet::from_pairs([("world", "nether"), ("world", "end")]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.values("WORLD"), vec!["end", "nether"]);
    }

    #[test]
    fn test_rejects_empty_entries() {
        let mut set = MutableContextSet::new();
        assert!(matches!(
            set.add("", "nether"),
            Err(CoreError::InvalidContext { .. })
        ));
        assert!(set.add("world", "   ").is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_subset_is_not_equal() {
        let small = ImmutableContextSet::from_pairs([("world", "nether")]).unwrap();
        let big = ImmutableContextSet::from_pairs([("world", "nether"), ("server", "a")]).unwrap();
        assert_ne!(small, big);
    }

    #[test]
    fn test_remove() {
        let mut set = MutableContextSet::from_pairs([("world", "nether"), ("world", "end")]).unwrap();
        assert!(set.remove("world", "end"));
        assert!(!set.remove("world", "end"));
        set.remove_all("WORLD");
        assert!(set.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(ImmutableContextSet::empty().to_string(), "global");

        let set = ImmutableContextSet::from_pairs([("world", "nether"), ("server", "a")]).unwrap();
        assert_eq!(set.to_string(), "server=a, world=nether");
    }
}
