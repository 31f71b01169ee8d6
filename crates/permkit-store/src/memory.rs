//! In-memory implementation of the HolderStorage trait.
//!
//! This is primarily for testing. Snapshots are kept as CBOR bytes so the
//! encode/decode path is exercised the same way a real backend would.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use permkit_holder::{HolderId, HolderKind, PermissionHolder};

use crate::error::Result;
use crate::snapshot::HolderSnapshot;
use crate::traits::HolderStorage;

/// In-memory storage.
///
/// All data is lost when the storage is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<MemoryStorageInner>,
}

#[derive(Debug, Default)]
struct MemoryStorageInner {
    /// Encoded snapshots indexed by holder.
    holders: HashMap<HolderId, Vec<u8>>,

    /// Number of saves performed, per holder.
    saves: HashMap<HolderId, u64>,
}

impl MemoryStorage {
    /// Create a new empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `id` has been saved.
    pub fn save_count(&self, id: &HolderId) -> u64 {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.saves.get(id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl HolderStorage for MemoryStorage {
    async fn save(&self, holder: &PermissionHolder) -> Result<()> {
        // Encode before taking our own lock.
        let bytes = HolderSnapshot::capture(holder).to_bytes()?;

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.holders.insert(holder.id().clone(), bytes);
        *inner.saves.entry(holder.id().clone()).or_default() += 1;
        Ok(())
    }

    async fn load(&self, id: &HolderId) -> Result<Option<HolderSnapshot>> {
        let bytes = {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            inner.holders.get(id).cloned()
        };

        match bytes {
            Some(bytes) => {
                let snapshot = HolderSnapshot::from_bytes(&bytes).map_err(|e| {
                    tracing::warn!(holder = %id, "stored snapshot is unreadable: {}", e);
                    e
                })?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &HolderId) -> Result<bool> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.saves.remove(id);
        Ok(inner.holders.remove(id).is_some())
    }

    async fn list(&self, kind: Option<HolderKind>) -> Result<Vec<HolderId>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        let mut ids: Vec<HolderId> = inner
            .holders
            .keys()
            .filter(|id| kind.map_or(true, |k| id.kind == k))
            .cloned()
            .collect();
        ids.sort();
        Ok(ids)
    }
}
