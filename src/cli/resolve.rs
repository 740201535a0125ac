//! Settings shared by every command: config location, vault token and the
//! desired-set source.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use dialoguer::Password;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::config::Config;
use crate::core::source::{Dotenv, Environment, Locator, OnePassword, Source};
use crate::error::{ConfigError, Result};

/// Global flags resolved once per invocation.
#[derive(Default)]
pub struct Context {
    /// Explicit config file path
    pub config: Option<PathBuf>,
    /// 1Password token from `--op-token` or the environment
    pub op_token: Option<Zeroizing<String>>,
}

impl Context {
    pub fn new(config: Option<PathBuf>, op_token: Option<String>) -> Self {
        Self {
            config,
            op_token: op_token.map(Zeroizing::new),
        }
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load(self.config.as_deref())
    }

    /// Vault token: flag or environment, then config, then an interactive
    /// prompt.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` when none is available and stdin
    /// is not a terminal.
    pub fn op_token(&self, config: &Config) -> Result<Zeroizing<String>> {
        if let Some(token) = self.op_token.as_ref().filter(|t| !t.trim().is_empty()) {
            debug!("using 1Password token from flag or environment");
            return Ok(token.clone());
        }

        if let Some(token) = config.op_token.as_ref().filter(|t| !t.trim().is_empty()) {
            debug!("using 1Password token from config");
            return Ok(Zeroizing::new(token.clone()));
        }

        if !io::stdin().is_terminal() {
            return Err(ConfigError::MissingToken.into());
        }

        let token = Password::new()
            .with_prompt("1Password service account token")
            .interact()?;
        Ok(Zeroizing::new(token))
    }

    /// Build the source to read from: a `.env` file when `from` is given,
    /// otherwise the 1Password vault.
    pub fn source(
        &self,
        config: &Config,
        from: Option<&Path>,
        vault: Option<&str>,
    ) -> Result<Box<dyn Source>> {
        if let Some(path) = from {
            debug!(path = %path.display(), "reading from dotenv file");
            return Ok(Box::new(Dotenv::new(path)));
        }

        let token = self.op_token(config)?;
        let vault = config.vault_or_default(vault);
        Ok(Box::new(OnePassword::new(&token, &vault)?))
    }

    /// Resolve the source and fetch the environment for `url` and `env`.
    pub fn fetch(
        &self,
        config: &Config,
        url: &str,
        env: &str,
        from: Option<&Path>,
        vault: Option<&str>,
    ) -> Result<(Locator, Environment)> {
        let locator = Locator::new(url, env)?;
        let source = self.source(config, from, vault)?;
        let environment = source.fetch_environment(&locator)?;
        debug!(
            item = %environment.item_id,
            count = environment.variables.len(),
            "fetched environment"
        );
        Ok((locator, environment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flag_token_wins_over_config() {
        let ctx = Context::new(None, Some("ops_flag".to_string()));
        let mut config = Config::default();
        config.op_token = Some("ops_config".to_string());
        assert_eq!(ctx.op_token(&config).unwrap().as_str(), "ops_flag");
    }

    #[test]
    fn test_config_token_used_when_flag_blank() {
        let ctx = Context::new(None, Some("  ".to_string()));
        let mut config = Config::default();
        config.op_token = Some("ops_config".to_string());
        assert_eq!(ctx.op_token(&config).unwrap().as_str(), "ops_config");
    }

    #[test]
    fn test_fetch_from_dotenv() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        std::fs::write(&path, "API_KEY=abc\n").unwrap();

        let ctx = Context::default();
        let (locator, environment) = ctx
            .fetch(
                &Config::default(),
                "https://github.com/acme/api",
                "staging",
                Some(path.as_path()),
                None,
            )
            .unwrap();

        assert_eq!(locator.environment, "staging");
        assert_eq!(environment.variables["API_KEY"], "abc");
    }

    #[test]
    fn test_fetch_rejects_blank_env() {
        let ctx = Context::default();
        let err = ctx
            .fetch(
                &Config::default(),
                "https://github.com/acme/api",
                "",
                Some(Path::new("/nonexistent")),
                None,
            )
            .unwrap_err();
        assert!(err.to_string().contains("environment cannot be empty"));
    }
}
