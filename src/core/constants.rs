//! Constants used throughout openv.
//!
//! Centralizes reserved names and configuration values.

/// Reserved desired-set key listing every other key name as a JSON array.
pub const MANIFEST_SEED_KEY: &str = "__openv_keys";

/// Manifest variable for organization secrets.
pub const MANIFEST_ORG_SECRETS: &str = "OPENV_KEYS_ORG_SECRETS";

/// Manifest variable for organization variables.
pub const MANIFEST_ORG_VARIABLES: &str = "OPENV_KEYS_ORG_VARIABLES";

/// Manifest variable for repository secrets.
pub const MANIFEST_REPO_SECRETS: &str = "OPENV_KEYS_REPO_SECRETS";

/// Manifest variable for repository variables.
pub const MANIFEST_REPO_VARIABLES: &str = "OPENV_KEYS_REPO_VARIABLES";

/// Manifest variable for repository environment secrets.
pub const MANIFEST_REPO_ENVIRONMENT_SECRETS: &str = "OPENV_KEYS_REPO_ENVIRONMENT_SECRETS";

/// Manifest variable for repository environment variables.
pub const MANIFEST_REPO_ENVIRONMENT_VARIABLES: &str = "OPENV_KEYS_REPO_ENVIRONMENT_VARIABLES";

/// Configuration file name, relative to HOME (~/.openv.toml).
pub const CONFIG_FILE: &str = ".openv.toml";

/// Default 1Password vault title.
pub const DEFAULT_VAULT: &str = "service-account";

/// Default GitHub REST endpoint.
pub const GITHUB_API: &str = "https://api.github.com";

/// GitHub REST API version header value.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Timeout for a single remote call.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the GitHub endpoint.
pub const ENV_GITHUB_API: &str = "OPENV_GITHUB_API";

/// Environment variable carrying the 1Password service account token.
pub const ENV_OP_TOKEN: &str = "OP_SERVICE_ACCOUNT_TOKEN";
