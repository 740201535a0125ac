//! Remote platform access.
//!
//! A [`ScopeClient`] exposes the two storage primitives of one scope:
//! write-only secrets and readable variables. A [`Platform`] hands out
//! scope clients.
//!
//! ## Implementations
//!
//! - **github**: GitHub Actions REST API over HTTPS.
//! - **memory**: In-process store that records every call, for tests. Built
//!   with the `testing` feature.

mod github;
#[cfg(any(test, feature = "testing"))]
mod memory;

pub use github::GitHub;
#[cfg(any(test, feature = "testing"))]
pub use memory::{Call, Memory, MemoryPlatform};

use crate::core::cipher::{PublicKeyMaterial, SealedSecret};
use crate::core::domain::{Scope, Upsert};
use crate::error::Result;

/// Outcome of a secret write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Written {
    Created,
    Updated,
}

impl From<Written> for Upsert {
    fn from(written: Written) -> Self {
        match written {
            Written::Created => Upsert::Created,
            Written::Updated => Upsert::Updated,
        }
    }
}

/// Operations available at one scope.
///
/// Secrets cannot be read or listed. Variables can be read back by name.
pub trait ScopeClient {
    /// The scope this client is bound to.
    fn scope(&self) -> &Scope;

    /// Fetch the scope's current public key for sealing secrets.
    fn public_key(&self) -> Result<PublicKeyMaterial>;

    /// Read a variable. `Ok(None)` when it does not exist.
    fn get_variable(&self, name: &str) -> Result<Option<String>>;

    fn create_variable(&self, name: &str, value: &str) -> Result<()>;

    fn update_variable(&self, name: &str, value: &str) -> Result<()>;

    fn delete_variable(&self, name: &str) -> Result<()>;

    /// Create or overwrite a secret.
    fn put_secret(&self, name: &str, secret: &SealedSecret) -> Result<Written>;

    fn delete_secret(&self, name: &str) -> Result<()>;
}

impl<T: ScopeClient + ?Sized> ScopeClient for &T {
    fn scope(&self) -> &Scope {
        (**self).scope()
    }

    fn public_key(&self) -> Result<PublicKeyMaterial> {
        (**self).public_key()
    }

    fn get_variable(&self, name: &str) -> Result<Option<String>> {
        (**self).get_variable(name)
    }

    fn create_variable(&self, name: &str, value: &str) -> Result<()> {
        (**self).create_variable(name, value)
    }

    fn update_variable(&self, name: &str, value: &str) -> Result<()> {
        (**self).update_variable(name, value)
    }

    fn delete_variable(&self, name: &str) -> Result<()> {
        (**self).delete_variable(name)
    }

    fn put_secret(&self, name: &str, secret: &SealedSecret) -> Result<Written> {
        (**self).put_secret(name, secret)
    }

    fn delete_secret(&self, name: &str) -> Result<()> {
        (**self).delete_secret(name)
    }
}

/// Source of scope clients.
pub trait Platform {
    /// Build a client for `scope`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ScopeResolution` if the scope does not exist.
    fn scope_client(&self, scope: &Scope) -> Result<Box<dyn ScopeClient + '_>>;
}
