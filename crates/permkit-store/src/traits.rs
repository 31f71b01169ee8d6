//! HolderStorage trait: the abstract interface for holder persistence.
//!
//! The mutation engine never calls storage itself. Callers save a holder
//! after a successful mutation, once the holder's lock has been released.

use async_trait::async_trait;

use permkit_holder::{HolderId, HolderKind, PermissionHolder};

use crate::error::Result;
use crate::snapshot::HolderSnapshot;

/// Async interface for holder persistence.
#[async_trait]
pub trait HolderStorage: Send + Sync {
    /// Persist the holder's current nodes, replacing any previous snapshot.
    async fn save(&self, holder: &PermissionHolder) -> Result<()>;

    /// Load a holder's snapshot, if one was saved.
    async fn load(&self, id: &HolderId) -> Result<Option<HolderSnapshot>>;

    /// Delete a holder's snapshot. Returns whether one existed.
    async fn delete(&self, id: &HolderId) -> Result<bool>;

    /// List stored holders, optionally filtered by kind.
    async fn list(&self, kind: Option<HolderKind>) -> Result<Vec<HolderId>>;
}

/// Extension methods for common storage patterns.
pub trait HolderStorageExt: HolderStorage {
    /// Load a holder, or create an empty one if nothing was stored.
    fn load_or_create(
        &self,
        id: &HolderId,
    ) -> impl std::future::Future<Output = Result<PermissionHolder>> + Send;
}

impl<S: HolderStorage + ?Sized> HolderStorageExt for S {
    async fn load_or_create(&self, id: &HolderId) -> Result<PermissionHolder> {
        Ok(match self.load(id).await? {
            Some(snapshot) => snapshot.into_holder(),
            None => PermissionHolder::new(id.clone()),
        })
    }
}
