//! Error types.
//!
//! Every fallible operation returns [`Result`]. Domain errors are grouped by
//! concern and folded into the top-level [`Error`] with `#[from]`.

use std::fmt;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("cannot locate home directory; pass --config")]
    NoHome,

    #[error("no 1Password token: pass --op-token or set OP_SERVICE_ACCOUNT_TOKEN")]
    MissingToken,
}

/// Sync profile errors.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profile not found: {0}")]
    NotFound(String),

    #[error("profile already exists: {0}")]
    AlreadyExists(String),

    #[error("{0} is not a valid sync type")]
    InvalidSyncType(String),

    #[error("{0} is not a valid flag")]
    InvalidFlag(String),

    #[error("sync type {0} is not supported yet")]
    InactiveSyncType(String),
}

/// A single secret that could not be removed during manifest cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for CleanupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.reason)
    }
}

/// Reconciliation and remote platform errors.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{operation} failed{suffix}: {message}", suffix = status_suffix(.status))]
    RemoteApi {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("cannot resolve scope: {0}")]
    ScopeResolution(String),

    #[error("sync not implemented for {0}")]
    UnimplementedSyncTarget(String),

    #[error("invalid GitHub URL: {0}")]
    MalformedUrl(String),

    #[error("failed to remove {} stale secret(s): {}", .failures.len(), join_failures(.failures))]
    PartialCleanup { failures: Vec<CleanupFailure> },

    #[error("sync cancelled before completion")]
    Cancelled,
}

impl SyncError {
    /// Build a `RemoteApi` error from an operation label and a message.
    pub fn remote(
        operation: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteApi {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    /// Names of the secrets that could not be deleted, if this is a cleanup error.
    pub fn failed_deletions(&self) -> Vec<&str> {
        match self {
            Self::PartialCleanup { failures } => {
                failures.iter().map(|f| f.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

fn join_failures(failures: &[CleanupFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Desired-set source errors (vault, .env files).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("no environment variables found for {url} ({env})")]
    NotFound { url: String, env: String },

    #[error("vault not found: {0}")]
    VaultNotFound(String),

    #[error("1Password CLI (op) not found in PATH")]
    CliMissing,

    #[error("1Password CLI failed: {0}")]
    CliFailed(String),

    #[error("unexpected 1Password response: {0}")]
    Decode(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("no command specified: use -- <command> or --command '<command>'")]
    NoCommand,

    #[error("no file or profile specified")]
    NoDestination,

    #[error("environment name is required for {0}")]
    MissingEnvironment(String),

    #[error("cannot derive a name from {0}")]
    UnnamedUrl(String),

    #[error("nothing to update: pass --sync, --token, --url or --flag")]
    NothingToUpdate,

    #[error("operation cancelled")]
    NotConfirmed,
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_api_display_with_status() {
        let err = SyncError::remote(
            "get repository public key",
            Some(403),
            "Resource not accessible",
        );
        assert_eq!(
            err.to_string(),
            "get repository public key failed (403): Resource not accessible"
        );
    }

    #[test]
    fn test_remote_api_display_without_status() {
        let err = SyncError::remote("delete secret A", None, "connection reset");
        assert_eq!(err.to_string(), "delete secret A failed: connection reset");
    }

    #[test]
    fn test_partial_cleanup_lists_failures() {
        let err = SyncError::PartialCleanup {
            failures: vec![CleanupFailure {
                name: "OLD_TOKEN".to_string(),
                reason: "boom".to_string(),
            }],
        };
        assert_eq!(err.failed_deletions(), vec!["OLD_TOKEN"]);
        assert!(err.to_string().contains("OLD_TOKEN (boom)"));
    }
}
