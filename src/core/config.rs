//! User configuration.
//!
//! Reads and writes `~/.openv.toml`: the vault token and name defaults plus
//! the saved sync profiles.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::profile::Profile;
use crate::error::{ConfigError, Result};

/// Contents of `~/.openv.toml`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 1Password service account token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_token: Option<String>,
    /// Default vault title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<String>,
    /// Saved sync targets
    #[serde(default)]
    pub sync_profiles: Vec<Profile>,
    #[serde(skip)]
    path: PathBuf,
}

impl Config {
    /// `~/.openv.toml`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHome` if the home directory cannot be found.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
        Ok(home.join(constants::CONFIG_FILE))
    }

    /// Load from `path`, or from the default location.
    ///
    /// A missing file yields an empty configuration bound to that path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            debug!("no config file, using defaults");
            return Ok(Self {
                path,
                ..Self::default()
            });
        }

        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.path = path;

        debug!(profiles = config.sync_profiles.len(), "config loaded");
        Ok(config)
    }

    /// Write back to the file it was loaded from, owner-only.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        debug!(path = %self.path.display(), "saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(&self.path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Vault to read from: explicit choice, then config, then the default.
    pub fn vault_or_default(&self, explicit: Option<&str>) -> String {
        explicit
            .or(self.vault.as_deref())
            .unwrap_or(constants::DEFAULT_VAULT)
            .to_string()
    }
}
