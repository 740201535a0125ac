//! Desired-set sources.
//!
//! A [`Source`] returns the variables stored for a repository URL and
//! environment name.
//!
//! ## Sources
//!
//! - **onepassword**: Secure Notes in a 1Password vault, read through the
//!   `op` CLI with a service account token.
//! - **dotenv**: A local `.env` file.

mod dotenv;
mod onepassword;

pub use dotenv::Dotenv;
pub use onepassword::{ImportRequest, OnePassword};

use std::collections::BTreeMap;

use crate::core::types::{PlainValue, VarName};
use crate::error::{Result, ValidationError};

/// Which stored environment to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub url: String,
    pub environment: String,
}

impl Locator {
    /// # Errors
    ///
    /// Returns `ValidationError::Empty` if either part is blank.
    pub fn new(url: impl Into<String>, environment: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let environment = environment.into();

        if url.trim().is_empty() {
            return Err(ValidationError::Empty("url").into());
        }
        if environment.trim().is_empty() {
            return Err(ValidationError::Empty("environment").into());
        }

        Ok(Self { url, environment })
    }

    /// URL without its scheme: `https://github.com/a/b` becomes `github.com/a/b`.
    pub fn base_name(&self) -> &str {
        base_name(&self.url)
    }

    /// Vault item title for this URL: `.env.<owner>.<repo>`, lowercased.
    pub fn item_name(&self) -> Result<String> {
        item_name(&self.url)
    }
}

/// Variables read from a source.
#[derive(Clone, Default)]
pub struct Environment {
    pub variables: BTreeMap<VarName, PlainValue>,
    /// Identifier of the item the variables came from
    pub item_id: String,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("item_id", &self.item_id)
            .field("keys", &self.variables.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Something that stores environments.
pub trait Source {
    /// Fetch the variables for `locator`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::NotFound` if nothing matches.
    fn fetch_environment(&self, locator: &Locator) -> Result<Environment>;
}

/// Strip a `scheme://` prefix.
pub fn base_name(url: &str) -> &str {
    url.rsplit("//").next().unwrap_or(url)
}

/// Derive `.env.<owner>.<repo>` from a repository URL.
///
/// # Errors
///
/// Returns `ValidationError::UnnamedUrl` if the URL has fewer than two
/// path segments.
pub fn item_name(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let parts: Vec<&str> = base_name(trimmed).split('/').collect();

    match parts.as_slice() {
        [.., owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok(format!(".env.{}.{}", owner, repo).to_lowercase())
        }
        _ => Err(ValidationError::UnnamedUrl(url.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("https://github.com/acme/api"), "github.com/acme/api");
        assert_eq!(base_name("github.com/acme/api"), "github.com/acme/api");
        assert_eq!(base_name(""), "");
    }

    #[test]
    fn test_item_name() {
        assert_eq!(item_name("https://github.com/Acme/API/").unwrap(), ".env.acme.api");
        assert_eq!(item_name("github.com/acme/api").unwrap(), ".env.acme.api");
        assert!(item_name("localhost").is_err());
    }

    #[test]
    fn test_locator_rejects_blank_parts() {
        assert!(Locator::new("", "production").is_err());
        assert!(Locator::new("github.com/acme/api", " ").is_err());

        let locator = Locator::new("https://github.com/acme/api", "production").unwrap();
        assert_eq!(locator.base_name(), "github.com/acme/api");
    }
}
