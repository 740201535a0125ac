//! Sync report type.

use crate::core::domain::{Scope, StorageKind};
use crate::core::types::VarName;

/// Outcome of writing one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
    Unchanged,
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Scope the pass ran against
    pub scope: Scope,
    /// Storage primitive written
    pub storage: StorageKind,
    /// Stale secrets removed during cleanup
    pub deleted: Vec<VarName>,
    /// Entries that did not exist before
    pub created: Vec<VarName>,
    /// Entries overwritten (always the case for existing secrets)
    pub updated: Vec<VarName>,
    /// Variables whose value already matched
    pub unchanged: Vec<VarName>,
    /// What happened to the manifest variable
    pub manifest: Upsert,
}

impl SyncReport {
    pub fn new(scope: Scope, storage: StorageKind) -> Self {
        Self {
            scope,
            storage,
            deleted: Vec::new(),
            created: Vec::new(),
            updated: Vec::new(),
            unchanged: Vec::new(),
            manifest: Upsert::Unchanged,
        }
    }

    /// Record the outcome of writing `name`.
    pub fn record(&mut self, name: &str, outcome: Upsert) {
        let bucket = match outcome {
            Upsert::Created => &mut self.created,
            Upsert::Updated => &mut self.updated,
            Upsert::Unchanged => &mut self.unchanged,
        };
        bucket.push(name.to_string());
    }

    /// Number of entries written (created or updated).
    pub fn written(&self) -> usize {
        self.created.len() + self.updated.len()
    }

    /// Whether the pass changed nothing remotely.
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.written() == 0 && self.manifest == Upsert::Unchanged
    }
}
