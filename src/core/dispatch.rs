//! Sync target dispatch.
//!
//! Maps a declared sync target and a repository URL to a scope and storage
//! kind, then runs the matching reconciliation pass.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::cancel::Cancellation;
use crate::core::domain::{DesiredSet, Scope, StorageKind, SyncReport};
use crate::core::reconcile::Reconciler;
use crate::core::remote::Platform;
use crate::error::{ProfileError, Result, SyncError, ValidationError};

/// Every sync target a profile can declare.
///
/// Only the GitHub targets are implemented. The others parse and display
/// so existing profiles load, but dispatching them fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncTarget {
    GithubOrgSecret,
    GithubOrgVariable,
    GithubRepoSecret,
    GithubRepoVariable,
    GithubEnvironmentSecret,
    GithubEnvironmentVariable,
    NetlifyDeployContext,
    NetlifyDeployContextScopeBuild,
    NetlifyDeployContextScopeFunctions,
    NetlifyDeployContextScopeRuntime,
    NetlifyDeployContextScopePostProcessing,
    VercelEnvironmentCustom,
    VercelEnvironmentProduction,
    VercelEnvironmentPreview,
    VercelEnvironmentDevelopment,
    DenoDeploy,
    ShopifyHydrogenEnvironment,
}

impl SyncTarget {
    pub const ALL: [SyncTarget; 17] = [
        Self::GithubOrgSecret,
        Self::GithubOrgVariable,
        Self::GithubRepoSecret,
        Self::GithubRepoVariable,
        Self::GithubEnvironmentSecret,
        Self::GithubEnvironmentVariable,
        Self::NetlifyDeployContext,
        Self::NetlifyDeployContextScopeBuild,
        Self::NetlifyDeployContextScopeFunctions,
        Self::NetlifyDeployContextScopeRuntime,
        Self::NetlifyDeployContextScopePostProcessing,
        Self::VercelEnvironmentCustom,
        Self::VercelEnvironmentProduction,
        Self::VercelEnvironmentPreview,
        Self::VercelEnvironmentDevelopment,
        Self::DenoDeploy,
        Self::ShopifyHydrogenEnvironment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GithubOrgSecret => "github-org-secret",
            Self::GithubOrgVariable => "github-org-variable",
            Self::GithubRepoSecret => "github-repo-secret",
            Self::GithubRepoVariable => "github-repo-variable",
            Self::GithubEnvironmentSecret => "github-environment-secret",
            Self::GithubEnvironmentVariable => "github-environment-variable",
            Self::NetlifyDeployContext => "netlify-deploy-context",
            Self::NetlifyDeployContextScopeBuild => "netlify-deploy-context-scope-build",
            Self::NetlifyDeployContextScopeFunctions => "netlify-deploy-context-scope-functions",
            Self::NetlifyDeployContextScopeRuntime => "netlify-deploy-context-scope-runtime",
            Self::NetlifyDeployContextScopePostProcessing => {
                "netlify-deploy-context-scope-post-processing"
            }
            Self::VercelEnvironmentCustom => "vercel-environment-custom",
            Self::VercelEnvironmentProduction => "vercel-environment-production",
            Self::VercelEnvironmentPreview => "vercel-environment-preview",
            Self::VercelEnvironmentDevelopment => "vercel-environment-development",
            Self::DenoDeploy => "deno-deploy",
            Self::ShopifyHydrogenEnvironment => "shopify-hydrogen-environment",
        }
    }

    /// Targets that can actually be synced.
    pub fn implemented() -> impl Iterator<Item = SyncTarget> {
        Self::ALL.into_iter().filter(SyncTarget::is_implemented)
    }

    pub fn is_github(&self) -> bool {
        matches!(
            self,
            Self::GithubOrgSecret
                | Self::GithubOrgVariable
                | Self::GithubRepoSecret
                | Self::GithubRepoVariable
                | Self::GithubEnvironmentSecret
                | Self::GithubEnvironmentVariable
        )
    }

    pub fn is_implemented(&self) -> bool {
        self.is_github()
    }

    /// Storage kind written by a GitHub target.
    pub fn storage(&self) -> Option<StorageKind> {
        match self {
            Self::GithubOrgSecret | Self::GithubRepoSecret | Self::GithubEnvironmentSecret => {
                Some(StorageKind::Secret)
            }
            Self::GithubOrgVariable
            | Self::GithubRepoVariable
            | Self::GithubEnvironmentVariable => Some(StorageKind::Variable),
            _ => None,
        }
    }
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncTarget {
    type Err = ProfileError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| ProfileError::InvalidSyncType(s.to_string()))
    }
}

/// Split a repository URL into `(owner, repo)`.
///
/// Takes the last two `/`-separated segments, so `github.com/acme/api`,
/// `https://github.com/acme/api` and `acme/api` all resolve the same. A
/// single trailing slash is ignored.
///
/// # Errors
///
/// Returns `SyncError::MalformedUrl` if fewer than two non-empty segments remain.
pub fn derive_location(url: &str) -> Result<(String, String)> {
    let trimmed = url.trim().strip_suffix('/').unwrap_or(url.trim());
    let mut parts = trimmed.rsplit('/');

    match (parts.next(), parts.next()) {
        (Some(repo), Some(owner)) if !repo.is_empty() && !owner.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(SyncError::MalformedUrl(url.to_string()).into()),
    }
}

/// Resolve the scope and storage kind a target writes to.
///
/// Organization targets use the URL owner as the organization. Environment
/// targets need `environment`.
pub fn plan(
    target: SyncTarget,
    url: &str,
    environment: Option<&str>,
) -> Result<(Scope, StorageKind)> {
    let storage = target
        .storage()
        .ok_or_else(|| SyncError::UnimplementedSyncTarget(target.to_string()))?;
    let (owner, repo) = derive_location(url)?;

    let scope = match target {
        SyncTarget::GithubOrgSecret | SyncTarget::GithubOrgVariable => Scope::organization(owner),
        SyncTarget::GithubRepoSecret | SyncTarget::GithubRepoVariable => {
            Scope::repository(owner, repo)
        }
        _ => {
            let environment = environment
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .ok_or_else(|| ValidationError::MissingEnvironment(target.to_string()))?;
            Scope::environment(owner, repo, environment)
        }
    };

    Ok((scope, storage))
}

/// Runs a sync target against a platform.
pub struct Dispatcher<'a> {
    platform: &'a dyn Platform,
    cancel: Cancellation,
}

impl<'a> Dispatcher<'a> {
    pub fn new(platform: &'a dyn Platform) -> Self {
        Self {
            platform,
            cancel: Cancellation::default(),
        }
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Reconcile the scope `target` resolves to with `desired`.
    ///
    /// # Errors
    ///
    /// - `UnimplementedSyncTarget` for non-GitHub targets
    /// - `MalformedUrl` if the URL has no owner/repo
    /// - `ScopeResolution` if the platform cannot find the scope
    /// - any reconciliation error
    pub fn dispatch(
        &self,
        target: SyncTarget,
        url: &str,
        environment: Option<&str>,
        desired: &DesiredSet,
    ) -> Result<SyncReport> {
        let (scope, storage) = plan(target, url, environment)?;
        debug!(%target, %scope, %storage, "dispatching");

        let client = self.platform.scope_client(&scope)?;
        let reconciler = Reconciler::new(client.as_ref()).with_cancellation(self.cancel.clone());

        let report = match storage {
            StorageKind::Secret => reconciler.sync_secrets(desired)?,
            StorageKind::Variable => reconciler.sync_variables(desired)?,
        };

        info!(%target, %scope, "sync complete");
        Ok(report)
    }
}
