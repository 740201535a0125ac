//! Push command.
//!
//! Fetches an environment and either writes it to a `.env` file or syncs it
//! through a saved profile.

use std::collections::BTreeMap;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Duration;

use dialoguer::Confirm;
use tracing::info;

use crate::cli::output;
use crate::cli::resolve::Context;
use crate::core::cancel::Cancellation;
use crate::core::constants::MANIFEST_SEED_KEY;
use crate::core::dispatch::Dispatcher;
use crate::core::domain::{DesiredSet, SyncReport, Upsert};
use crate::core::env::Env;
use crate::core::profile::{Profile, ProfileStore};
use crate::core::remote::GitHub;
use crate::core::source::Locator;
use crate::core::types::{PlainValue, VarName};
use crate::error::{Result, ValidationError};

/// Arguments to `openv push`.
#[derive(Debug, Default)]
pub struct PushArgs {
    pub url: String,
    pub env: String,
    pub file: Option<PathBuf>,
    pub profile: Option<String>,
    pub yes: bool,
    pub vault: Option<String>,
    pub from: Option<PathBuf>,
    pub timeout: Option<u64>,
}

/// Push an environment.
pub fn execute(ctx: &Context, args: PushArgs) -> Result<()> {
    if args.file.is_none() && args.profile.is_none() {
        return Err(ValidationError::NoDestination.into());
    }

    let mut config = ctx.load_config()?;

    // Resolve the profile before touching the vault.
    let profile = match &args.profile {
        Some(name) => Some(ProfileStore::new(&mut config).get(name)?.clone()),
        None => None,
    };

    let (locator, environment) = ctx.fetch(
        &config,
        &args.url,
        &args.env,
        args.from.as_deref(),
        args.vault.as_deref(),
    )?;
    info!(count = environment.variables.len(), "fetched environment");

    if let Some(path) = &args.file {
        let count = export(&locator, environment.variables, path)?;
        output::success(&format!(
            "exported {} variables to {}",
            output::count(count),
            output::path(path.display())
        ));
        return Ok(());
    }

    let Some(profile) = profile else {
        return Err(ValidationError::NoDestination.into());
    };

    let mut desired = DesiredSet::new(environment.variables);
    if profile.prefix_with_env() {
        desired = desired.with_prefix(&locator.environment);
    }

    if !args.yes && !confirm(&profile, &locator, desired.len())? {
        output::dimmed("cancelled");
        return Ok(());
    }

    let mut cancel = Cancellation::new();
    if let Some(secs) = args.timeout {
        cancel = cancel.with_timeout(Duration::from_secs(secs));
    }

    let github = GitHub::new(&profile.token)?;
    let report = Dispatcher::new(&github).with_cancellation(cancel).dispatch(
        profile.sync,
        &locator.url,
        Some(locator.environment.as_str()),
        &desired,
    )?;

    print_report(&profile, &report);
    Ok(())
}

/// Write `variables` to `path` with a provenance header. Returns the number
/// of variables written.
pub fn export(
    locator: &Locator,
    mut variables: BTreeMap<VarName, PlainValue>,
    path: &Path,
) -> Result<usize> {
    variables.remove(MANIFEST_SEED_KEY);

    let env = Env::new(variables, path)
        .with_header(format!(
            "Environment variables for {} ({})",
            locator.base_name(),
            locator.environment
        ))
        .with_header(format!("Generated by openv {}", env!("CARGO_PKG_VERSION")));
    env.save()?;
    Ok(env.len())
}

fn confirm(profile: &Profile, locator: &Locator, count: usize) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Err(ValidationError::NotConfirmed.into());
    }

    let prompt = format!(
        "Sync {} variables from {} ({}) to {} via {}?",
        count,
        locator.base_name(),
        locator.environment,
        profile.sync,
        output::key(&profile.name)
    );
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn print_report(profile: &Profile, report: &SyncReport) {
    if report.is_noop() {
        output::success(&format!("{} already up to date", report.scope));
        return;
    }

    output::success(&format!(
        "synced {} {}s to {} via {}",
        output::count(report.written() + report.unchanged.len()),
        report.storage,
        report.scope,
        output::key(&profile.name)
    ));
    output::kv("created:  ", report.created.len());
    output::kv("updated:  ", report.updated.len());
    if !report.unchanged.is_empty() {
        output::kv("unchanged:", report.unchanged.len());
    }
    if !report.deleted.is_empty() {
        output::kv("deleted:  ", report.deleted.len());
        for name in &report.deleted {
            output::list_item(name);
        }
    }
    if report.manifest == Upsert::Created {
        output::dimmed("  started tracking key names for this scope");
    }
}
