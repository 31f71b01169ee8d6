//! MetaService: the caller-side sequence around the mutation engine.
//!
//! A command runs in three steps:
//!
//! 1. mutate the holder through the engine (under the holder's lock),
//! 2. submit an audit entry describing the change,
//! 3. save the holder (lock released).
//!
//! A failed save does not undo the change, and the audit entry has already
//! been submitted by then.
//!
//! Permission gating and argument parsing happen before the service is called.

use std::sync::Arc;

use permkit_core::{ChatMetaType, DataMutateResult, MutableContextSet};
use permkit_holder::{mutation, HolderId, MetaTarget, PermissionHolder};
use permkit_store::{HolderStorage, HolderStorageExt};

use crate::audit::{describe_chat_meta_action, AuditSink, LogEntry};
use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};

/// Outcome of a command, used by the caller to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command did what was asked.
    Success,
    /// The holder was not in a state the command could act on
    /// (e.g. it lacks the meta being removed, or already has the one being added).
    StateError,
}

impl From<DataMutateResult> for CommandOutcome {
    fn from(result: DataMutateResult) -> Self {
        if result.as_bool() {
            CommandOutcome::Success
        } else {
            CommandOutcome::StateError
        }
    }
}

/// Chat meta commands over a storage backend and an audit sink.
pub struct MetaService<S: HolderStorage, A: AuditSink> {
    storage: Arc<S>,
    audit: A,
    config: ServiceConfig,
}

impl<S: HolderStorage, A: AuditSink> MetaService<S, A> {
    /// Create a new service.
    pub fn new(storage: S, audit: A, config: ServiceConfig) -> Self {
        Self {
            storage: Arc::new(storage),
            audit,
            config,
        }
    }

    /// Get the storage reference.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Load a holder from storage, or create an empty one.
    pub async fn load(&self, id: &HolderId) -> Result<PermissionHolder> {
        Ok(self.storage.load_or_create(id).await?)
    }

    /// Replace a live holder's nodes with its stored snapshot.
    ///
    /// Returns false, leaving the holder untouched, if nothing was stored.
    pub async fn reload(&self, holder: &PermissionHolder) -> Result<bool> {
        match self.storage.load(holder.id()).await? {
            Some(snapshot) => {
                holder.replace_nodes(snapshot.nodes);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chat Meta Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove chat meta from a holder.
    ///
    /// A missing `target_arg`, `"null"` (any case) or `"*"` clears the whole
    /// `(meta_type, priority, contexts)` slot and always succeeds. Any other
    /// value removes that exact entry, giving `StateError` if it is absent.
    pub async fn remove_chat_meta(
        &self,
        actor: &str,
        holder: &PermissionHolder,
        meta_type: ChatMetaType,
        priority: i32,
        target_arg: Option<&str>,
        contexts: &MutableContextSet,
    ) -> Result<CommandOutcome> {
        let target_arg = target_arg.unwrap_or("null");
        let target = MetaTarget::parse(target_arg);
        let outcome = mutation::remove_chat_meta(holder, meta_type, priority, &target, contexts);

        if !outcome.result.as_bool() {
            tracing::debug!(
                holder = %holder.id(),
                meta_type = meta_type.name(),
                priority,
                "holder does not have chat meta"
            );
            return Ok(CommandOutcome::StateError);
        }

        if !target.is_bulk() || self.config.audit_bulk_removals {
            let action =
                describe_chat_meta_action("remove", meta_type, priority, target_arg, contexts);
            self.audit
                .submit(LogEntry::builder(actor, holder).action(action).build());
        }

        // Bulk removals are saved even when they matched nothing.
        self.save(holder).await?;

        Ok(CommandOutcome::Success)
    }

    /// Add a permanent chat meta entry to a holder.
    pub async fn add_chat_meta(
        &self,
        actor: &str,
        holder: &PermissionHolder,
        meta_type: ChatMetaType,
        priority: i32,
        value: &str,
        contexts: &MutableContextSet,
    ) -> Result<CommandOutcome> {
        let result = mutation::add_chat_meta(holder, meta_type, priority, value, contexts);
        self.finish_add(actor, holder, result, || {
            describe_chat_meta_action("add", meta_type, priority, value, contexts)
        })
        .await
    }

    /// Add a chat meta entry that expires at `expiry` (Unix milliseconds).
    #[allow(clippy::too_many_arguments)]
    pub async fn add_temp_chat_meta(
        &self,
        actor: &str,
        holder: &PermissionHolder,
        meta_type: ChatMetaType,
        priority: i32,
        value: &str,
        contexts: &MutableContextSet,
        expiry: i64,
    ) -> Result<CommandOutcome> {
        let result =
            mutation::add_temp_chat_meta(holder, meta_type, priority, value, contexts, expiry);
        self.finish_add(actor, holder, result, || {
            let mut action =
                describe_chat_meta_action("addtemp", meta_type, priority, value, contexts);
            action.push_str(&format!(" until {}", expiry));
            action
        })
        .await
    }

    async fn finish_add<F>(
        &self,
        actor: &str,
        holder: &PermissionHolder,
        result: DataMutateResult,
        describe: F,
    ) -> Result<CommandOutcome>
    where
        F: FnOnce() -> String,
    {
        if result.as_bool() {
            self.audit
                .submit(LogEntry::builder(actor, holder).action(describe()).build());
            self.save(holder).await?;
        }
        Ok(result.into())
    }

    /// Drop expired temporary nodes, saving the holder if any were removed.
    pub async fn audit_expired(&self, holder: &PermissionHolder, now: i64) -> Result<usize> {
        let removed = holder.audit_temporary_nodes(now);
        if removed > 0 {
            self.save(holder).await?;
        }
        Ok(removed)
    }

    async fn save(&self, holder: &PermissionHolder) -> Result<()> {
        if !self.config.save_after_mutation {
            return Ok(());
        }

        self.storage.save(holder).await.map_err(|source| {
            tracing::warn!(holder = %holder.id(), "failed to save holder: {}", source);
            ServiceError::SaveFailed {
                holder: holder.id().clone(),
                source,
            }
        })
    }
}
