//! Service configuration.

/// Configuration for [`MetaService`](crate::MetaService).
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Save the holder after every successful mutation.
    pub save_after_mutation: bool,
    /// Submit audit entries for bulk removals too.
    pub audit_bulk_removals: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            save_after_mutation: true,
            audit_bulk_removals: false,
        }
    }
}
