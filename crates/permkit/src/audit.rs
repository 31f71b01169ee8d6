//! Audit log entries.
//!
//! Every structural change made through [`MetaService`](crate::MetaService)
//! is described by a [`LogEntry`] and handed to an [`AuditSink`]. The sink is
//! opaque to the service: submission cannot fail from its point of view.

use std::fmt;
use std::sync::Arc;

use permkit_core::{ChatMetaType, MutableContextSet};
use permkit_holder::{HolderId, PermissionHolder};

/// A record of one change: who did what to whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the change happened (Unix milliseconds).
    pub timestamp: i64,
    /// Who made the change.
    pub actor: String,
    /// The holder that was changed.
    pub acted: HolderId,
    /// Human-readable description, e.g. `meta removeprefix 10 "[Admin]"`.
    pub action: String,
}

impl LogEntry {
    /// Start building an entry.
    pub fn builder(actor: impl Into<String>, acted: &PermissionHolder) -> LogEntryBuilder {
        LogEntryBuilder {
            actor: actor.into(),
            acted: acted.id().clone(),
            action: String::new(),
            timestamp: None,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) [{}] {}", self.actor, self.acted, self.action)
    }
}

/// Builder for [`LogEntry`].
#[derive(Debug, Clone)]
pub struct LogEntryBuilder {
    actor: String,
    acted: HolderId,
    action: String,
    timestamp: Option<i64>,
}

impl LogEntryBuilder {
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Finish the entry, stamping it with the current time if none was set.
    pub fn build(self) -> LogEntry {
        LogEntry {
            timestamp: self.timestamp.unwrap_or_else(crate::now_millis),
            actor: self.actor,
            acted: self.acted,
            action: self.action,
        }
    }
}

/// Destination for audit entries.
pub trait AuditSink: Send + Sync {
    fn submit(&self, entry: LogEntry);
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn submit(&self, entry: LogEntry) {
        (**self).submit(entry)
    }
}

/// Sink that writes entries to the `permkit::audit` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn submit(&self, entry: LogEntry) {
        tracing::info!(
            target: "permkit::audit",
            actor = %entry.actor,
            acted = %entry.acted,
            timestamp = entry.timestamp,
            "{}",
            entry.action
        );
    }
}

/// Quote an argument the way it would have to be typed.
fn wrap_arg(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

/// Describe a chat meta command as a single action line.
///
/// `verb` is `add`, `addtemp` or `remove`; `value` is the raw target
/// argument, including `*`/`null` for bulk removals.
pub fn describe_chat_meta_action(
    verb: &str,
    meta_type: ChatMetaType,
    priority: i32,
    value: &str,
    contexts: &MutableContextSet,
) -> String {
    let mut action = format!(
        "meta {}{} {} {}",
        verb,
        meta_type.name(),
        priority,
        wrap_arg(value)
    );
    for (k, v) in contexts.iter() {
        action.push(' ');
        action.push_str(&wrap_arg(&format!("{}={}", k, v)));
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_action() {
        let contexts = MutableContextSet::from_pairs([("world", "nether")]).unwrap();
        let action =
            describe_chat_meta_action("remove", ChatMetaType::Suffix, 5, "X", &contexts);
        assert_eq!(action, "meta removesuffix 5 X world=nether");
    }

    #[test]
    fn test_describe_action_quotes_spaces() {
        let action = describe_chat_meta_action(
            "add",
            ChatMetaType::Prefix,
            10,
            "&c[Big Admin]",
            &MutableContextSet::new(),
        );
        assert_eq!(action, "meta addprefix 10 \"&c[Big Admin]\"");
    }

    #[test]
    fn test_builder_stamps_time() {
        let holder = PermissionHolder::new(HolderId::user("alice"));
        let entry = LogEntry::builder("console", &holder).action("x").build();
        assert!(entry.timestamp > 0);

        let fixed = LogEntry::builder("console", &holder)
            .action("x")
            .timestamp(7)
            .build();
        assert_eq!(fixed.timestamp, 7);
        assert_eq!(fixed.to_string(), "(console) [user:alice] x");
    }
}
