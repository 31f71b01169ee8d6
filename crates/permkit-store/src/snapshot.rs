//! Holder snapshots: the unit of persistence.

use serde::{Deserialize, Serialize};

use permkit_core::Node;
use permkit_holder::{HolderId, PermissionHolder};

use crate::error::{Result, StoreError};

/// A point-in-time copy of a holder's nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderSnapshot {
    pub id: HolderId,
    pub nodes: Vec<Node>,
}

impl HolderSnapshot {
    /// Take a snapshot of a holder under its read lock.
    pub fn capture(holder: &PermissionHolder) -> Self {
        Self {
            id: holder.id().clone(),
            nodes: holder.nodes(),
        }
    }

    /// Build a holder from this snapshot.
    pub fn into_holder(self) -> PermissionHolder {
        PermissionHolder::with_nodes(self.id, self.nodes)
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
