//! Reconciliation of one scope against a desired set.
//!
//! Variables are diffed by value. Secrets cannot be read back, so they are
//! always rewritten, and removals are detected through the manifest variable
//! that records which secret names the previous pass wrote.
//!
//! A secret pass runs in a fixed order:
//!
//! 1. fetch the scope public key
//! 2. read the manifest
//! 3. delete secrets the manifest lists but the desired set lacks
//! 4. seal and write every desired secret, in key order
//! 5. rewrite the manifest
//!
//! Every delete happens before any write, and the manifest is written last so
//! an interrupted pass leaves the previous manifest in place.

use tracing::{debug, info, warn};

use crate::core::cancel::Cancellation;
use crate::core::cipher;
use crate::core::domain::{DesiredSet, StorageKind, SyncReport, Upsert};
use crate::core::manifest::Manifest;
use crate::core::remote::ScopeClient;
use crate::error::{CleanupFailure, Result, SyncError};

/// Runs reconciliation passes against a single scope client.
pub struct Reconciler<'a> {
    client: &'a dyn ScopeClient,
    cancel: Cancellation,
}

impl<'a> Reconciler<'a> {
    pub fn new(client: &'a dyn ScopeClient) -> Self {
        Self {
            client,
            cancel: Cancellation::default(),
        }
    }

    /// Bound passes by a deadline or shared stop flag.
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Make the scope's variables match `desired`.
    ///
    /// Reads each variable and writes only when absent or different, then
    /// upserts the seed as the variable manifest. Variables missing from
    /// `desired` are left alone.
    ///
    /// # Errors
    ///
    /// The first failed read or write aborts the pass.
    pub fn sync_variables(&self, desired: &DesiredSet) -> Result<SyncReport> {
        let scope = self.client.scope();
        let mut report = SyncReport::new(scope.clone(), StorageKind::Variable);

        for (name, value) in desired.entries() {
            self.cancel.check()?;
            let outcome = self.upsert_variable(name, value)?;
            report.record(name, outcome);
        }

        self.cancel.check()?;
        report.manifest =
            self.upsert_variable(scope.manifest_name(StorageKind::Variable), desired.seed())?;

        info!(
            scope = %report.scope,
            created = report.created.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged.len(),
            "variables synced"
        );

        Ok(report)
    }

    /// Make the scope's secrets match `desired`.
    ///
    /// # Errors
    ///
    /// - `RemoteApi` if the public key or manifest cannot be read, or a
    ///   secret write fails. Nothing after the failing call runs.
    /// - `Encoding` if the public key is unusable. Nothing is deleted or
    ///   written.
    /// - `PartialCleanup` if every write succeeded but some stale secrets
    ///   could not be deleted. Only the failed deletions are listed.
    /// - `Cancelled` if the pass was stopped between operations.
    pub fn sync_secrets(&self, desired: &DesiredSet) -> Result<SyncReport> {
        let scope = self.client.scope();
        let manifest_name = scope.manifest_name(StorageKind::Secret);
        let mut report = SyncReport::new(scope.clone(), StorageKind::Secret);

        self.cancel.check()?;
        let recipient = cipher::recipient(&self.client.public_key()?)?;
        debug!(key_id = recipient.key_id(), "fetched public key");

        self.cancel.check()?;
        let manifest = Manifest::decode_opt(self.client.get_variable(manifest_name)?.as_deref());
        debug!(tracked = manifest.len(), "read manifest");

        let mut failures = Vec::new();
        for name in manifest.removed(desired) {
            self.cancel.check()?;
            match self.client.delete_secret(&name) {
                Ok(()) => {
                    debug!(name = %name, "deleted stale secret");
                    report.deleted.push(name);
                }
                Err(e) => {
                    warn!(name = %name, error = %e, "failed to delete stale secret");
                    failures.push(CleanupFailure {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        for (name, value) in desired.entries() {
            self.cancel.check()?;
            let sealed = recipient.seal(value)?;
            let written = self.client.put_secret(name, &sealed)?;
            report.record(name, written.into());
        }

        self.cancel.check()?;
        report.manifest = self.upsert_variable(manifest_name, desired.seed())?;

        info!(
            scope = %report.scope,
            deleted = report.deleted.len(),
            created = report.created.len(),
            updated = report.updated.len(),
            "secrets synced"
        );

        if !failures.is_empty() {
            return Err(SyncError::PartialCleanup { failures }.into());
        }

        Ok(report)
    }

    fn upsert_variable(&self, name: &str, value: &str) -> Result<Upsert> {
        match self.client.get_variable(name)? {
            Some(existing) if existing == value => Ok(Upsert::Unchanged),
            Some(_) => {
                self.client.update_variable(name, value)?;
                Ok(Upsert::Updated)
            }
            None => {
                self.client.create_variable(name, value)?;
                Ok(Upsert::Created)
            }
        }
    }
}
