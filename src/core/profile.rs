//! Sync profiles.
//!
//! A profile names a sync target together with the credentials needed to
//! reach it. Profiles live in the `[[sync_profiles]]` table of the config.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::Config;
use crate::core::dispatch::SyncTarget;
use crate::error::{ProfileError, Result};

/// Behavior switches on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileFlag {
    /// Prefix every key with `ENV_` before syncing
    PrefixWithEnv,
}

impl ProfileFlag {
    pub const ALL: [ProfileFlag; 1] = [Self::PrefixWithEnv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrefixWithEnv => "prefix-with-env",
        }
    }
}

impl fmt::Display for ProfileFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileFlag {
    type Err = ProfileError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str() == s)
            .ok_or_else(|| ProfileError::InvalidFlag(s.to_string()))
    }
}

/// A saved sync target.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub sync: SyncTarget,
    pub token: String,
    pub url: String,
    #[serde(default)]
    pub flags: Vec<ProfileFlag>,
}

impl Profile {
    pub fn prefix_with_env(&self) -> bool {
        self.flags.contains(&ProfileFlag::PrefixWithEnv)
    }

    /// Token with all but the last four characters hidden.
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("sync", &self.sync)
            .field("token", &self.masked_token())
            .field("url", &self.url)
            .field("flags", &self.flags)
            .finish()
    }
}

/// Fields to change on an existing profile. `None` keeps the current value.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub sync: Option<SyncTarget>,
    pub token: Option<String>,
    pub url: Option<String>,
    pub flags: Option<Vec<ProfileFlag>>,
}

/// Profile operations over a loaded config.
pub struct ProfileStore<'a> {
    config: &'a mut Config,
}

impl<'a> ProfileStore<'a> {
    pub fn new(config: &'a mut Config) -> Self {
        Self { config }
    }

    /// Add and persist a profile.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the name is taken
    /// - `InactiveSyncType` if the target cannot be synced yet
    pub fn add(&mut self, profile: Profile) -> Result<()> {
        if self.config.sync_profiles.iter().any(|p| p.name == profile.name) {
            return Err(ProfileError::AlreadyExists(profile.name).into());
        }
        ensure_active(profile.sync)?;

        debug!(name = %profile.name, sync = %profile.sync, "adding profile");
        self.config.sync_profiles.push(profile);
        self.config.save()
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> Result<&Profile> {
        self.config
            .sync_profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()).into())
    }

    pub fn list(&self) -> &[Profile] {
        &self.config.sync_profiles
    }

    /// Remove and persist.
    pub fn remove(&mut self, name: &str) -> Result<Profile> {
        let index = self
            .config
            .sync_profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;

        let removed = self.config.sync_profiles.remove(index);
        debug!(name, "removed profile");
        self.config.save()?;
        Ok(removed)
    }

    /// Apply `update` to the named profile and persist.
    pub fn update(&mut self, name: &str, update: ProfileUpdate) -> Result<()> {
        if let Some(sync) = update.sync {
            ensure_active(sync)?;
        }

        let profile = self
            .config
            .sync_profiles
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;

        if let Some(sync) = update.sync {
            profile.sync = sync;
        }
        if let Some(token) = update.token {
            profile.token = token;
        }
        if let Some(url) = update.url {
            profile.url = url;
        }
        if let Some(flags) = update.flags {
            profile.flags = flags;
        }

        debug!(name, "updated profile");
        self.config.save()
    }

    /// Check that every name refers to a saved profile.
    pub fn validate(&self, names: &[String]) -> Result<()> {
        for name in names {
            self.get(name)?;
        }
        Ok(())
    }
}

fn ensure_active(sync: SyncTarget) -> Result<()> {
    if sync.is_implemented() {
        Ok(())
    } else {
        Err(ProfileError::InactiveSyncType(sync.to_string()).into())
    }
}

/// Parse flag names, rejecting unknown ones.
pub fn parse_flags<S: AsRef<str>>(raw: &[S]) -> Result<Vec<ProfileFlag>> {
    raw.iter()
        .map(|s| s.as_ref().parse::<ProfileFlag>().map_err(Into::into))
        .collect()
}
