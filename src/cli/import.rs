//! Import command - store a .env file in 1Password.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::cli::resolve::Context;
use crate::core::env::Env;
use crate::core::profile::ProfileStore;
use crate::core::source::{ImportRequest, Locator, OnePassword};
use crate::error::Result;

/// Store the variables in `file` as the environment for `url` and `env`.
pub fn execute(
    ctx: &Context,
    url: &str,
    env: &str,
    file: &Path,
    sync: Vec<String>,
    vault: Option<&str>,
) -> Result<()> {
    let mut config = ctx.load_config()?;
    ProfileStore::new(&mut config).validate(&sync)?;

    let locator = Locator::new(url, env)?;
    let item_name = locator.item_name()?;
    let variables = Env::load(file)?.into_vars();
    if variables.is_empty() {
        output::warn(&format!("{} has no variables", file.display()));
    }

    let token = ctx.op_token(&config)?;
    let vault = config.vault_or_default(vault);
    let op = OnePassword::new(&token, &vault)?;

    let count = variables.len();
    let id = op.import(&ImportRequest {
        locator,
        variables,
        sync_profiles: sync,
    })?;
    info!(item = %id, count, "imported environment");

    output::success(&format!(
        "imported {} variables into {}",
        output::count(count),
        output::key(&item_name)
    ));
    output::kv("vault:", &vault);
    output::kv("item: ", &id);
    Ok(())
}
