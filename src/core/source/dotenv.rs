//! `.env` file source.

use std::path::PathBuf;

use tracing::debug;

use super::{Environment, Locator, Source};
use crate::core::env::Env;
use crate::error::{Result, SourceError};

/// Reads a single `.env` file regardless of the locator.
#[derive(Debug, Clone)]
pub struct Dotenv {
    path: PathBuf,
}

impl Dotenv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Source for Dotenv {
    fn fetch_environment(&self, locator: &Locator) -> Result<Environment> {
        if !self.path.exists() {
            return Err(SourceError::NotFound {
                url: self.path.display().to_string(),
                env: locator.environment.clone(),
            }
            .into());
        }

        let env = Env::load(&self.path)?;
        debug!(path = %self.path.display(), count = env.len(), "read dotenv source");

        Ok(Environment {
            item_id: self.path.display().to_string(),
            variables: env.into_vars(),
        })
    }
}
