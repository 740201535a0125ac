//! Scope types.
//!
//! Where secrets and variables live on the remote platform, and which of the
//! two storage primitives a pass targets.

use std::fmt;

use crate::core::constants;

/// The shape of a scope, without its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Organization,
    Repository,
    RepositoryEnvironment,
}

/// Storage primitive at a scope.
///
/// Secrets are write-only and encrypted by the platform. Variables are
/// plaintext and can be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Secret,
    Variable,
}

impl StorageKind {
    /// Lowercase display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Secret => "secret",
            Self::Variable => "variable",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An addressable location on the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Organization {
        org: String,
    },
    Repository {
        owner: String,
        repo: String,
    },
    RepositoryEnvironment {
        owner: String,
        repo: String,
        environment: String,
    },
}

impl Scope {
    pub fn organization(org: impl Into<String>) -> Self {
        Self::Organization { org: org.into() }
    }

    pub fn repository(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self::Repository {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn environment(
        owner: impl Into<String>,
        repo: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self::RepositoryEnvironment {
            owner: owner.into(),
            repo: repo.into(),
            environment: environment.into(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        match self {
            Self::Organization { .. } => ScopeKind::Organization,
            Self::Repository { .. } => ScopeKind::Repository,
            Self::RepositoryEnvironment { .. } => ScopeKind::RepositoryEnvironment,
        }
    }

    /// Reserved variable name holding the manifest for `storage` at this scope.
    ///
    /// Each scope kind uses its own name so an organization manifest never
    /// collides with a repository one.
    pub fn manifest_name(&self, storage: StorageKind) -> &'static str {
        use StorageKind::*;

        match (self.kind(), storage) {
            (ScopeKind::Organization, Secret) => constants::MANIFEST_ORG_SECRETS,
            (ScopeKind::Organization, Variable) => constants::MANIFEST_ORG_VARIABLES,
            (ScopeKind::Repository, Secret) => constants::MANIFEST_REPO_SECRETS,
            (ScopeKind::Repository, Variable) => constants::MANIFEST_REPO_VARIABLES,
            (ScopeKind::RepositoryEnvironment, Secret) => {
                constants::MANIFEST_REPO_ENVIRONMENT_SECRETS
            }
            (ScopeKind::RepositoryEnvironment, Variable) => {
                constants::MANIFEST_REPO_ENVIRONMENT_VARIABLES
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization { org } => write!(f, "org {}", org),
            Self::Repository { owner, repo } => write!(f, "{}/{}", owner, repo),
            Self::RepositoryEnvironment {
                owner,
                repo,
                environment,
            } => write!(f, "{}/{} ({})", owner, repo, environment),
        }
    }
}
