//! Profile commands.
//!
//! Add, list, remove, and update sync profiles. Missing fields are prompted
//! for when stdin is a terminal.

use std::io::{self, IsTerminal};

use dialoguer::{Input, Password, Select};
use tracing::info;

use crate::cli::output;
use crate::cli::resolve::Context;
use crate::core::dispatch::SyncTarget;
use crate::core::profile::{parse_flags, Profile, ProfileStore, ProfileUpdate};
use crate::error::{Result, ValidationError};

const DEFAULT_URL: &str = "https://github.com";

/// Add a sync profile.
pub fn add(
    ctx: &Context,
    name: Option<String>,
    sync: Option<SyncTarget>,
    token: Option<String>,
    url: Option<String>,
    flags: &[String],
) -> Result<()> {
    let flags = parse_flags(flags)?;
    let interactive = io::stdin().is_terminal();

    let name = match name {
        Some(n) => n,
        None if interactive => Input::<String>::new()
            .with_prompt("Profile name")
            .interact_text()?,
        None => return Err(ValidationError::Empty("profile name").into()),
    };
    if name.trim().is_empty() {
        return Err(ValidationError::Empty("profile name").into());
    }

    let sync = match sync {
        Some(s) => s,
        None if interactive => select_sync()?,
        None => return Err(ValidationError::Empty("sync type").into()),
    };

    let token = match token {
        Some(t) => t,
        None if interactive => Password::new()
            .with_prompt(format!("Token for {}", sync))
            .interact()?,
        None => return Err(ValidationError::Empty("token").into()),
    };
    if token.trim().is_empty() {
        return Err(ValidationError::Empty("token").into());
    }

    let url = match url {
        Some(u) => u,
        None if interactive => Input::<String>::new()
            .with_prompt("Platform URL")
            .default(DEFAULT_URL.to_string())
            .interact_text()?,
        None => DEFAULT_URL.to_string(),
    };

    let mut config = ctx.load_config()?;
    info!("Adding profile: {}", name);
    ProfileStore::new(&mut config).add(Profile {
        name: name.clone(),
        sync,
        token,
        url,
        flags,
    })?;

    output::success(&format!("added profile {}", output::key(&name)));
    Ok(())
}

fn select_sync() -> Result<SyncTarget> {
    let targets: Vec<SyncTarget> = SyncTarget::implemented().collect();
    let names: Vec<&str> = targets.iter().map(SyncTarget::as_str).collect();

    let index = Select::new()
        .with_prompt("Sync type")
        .items(&names)
        .default(0)
        .interact()?;
    Ok(targets[index])
}

/// List sync profiles with masked tokens.
pub fn list(ctx: &Context, json: bool) -> Result<()> {
    let mut config = ctx.load_config()?;
    let store = ProfileStore::new(&mut config);
    let profiles = store.list();

    if json {
        let entries: Vec<_> = profiles
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "sync": p.sync,
                    "url": p.url,
                    "token": p.masked_token(),
                    "flags": p.flags,
                })
            })
            .collect();
        output::data(&serde_json::to_string_pretty(&entries)?);
    } else if profiles.is_empty() {
        output::dimmed("no sync profiles");
        output::hint("run: openv profile add");
    } else {
        output::blank();
        output::header(&format!("{} sync profiles", output::count(profiles.len())));
        output::rule();
        for profile in profiles {
            output::kv(&profile.name, format!("{} {}", profile.sync, profile.url));
            output::dimmed(&format!("    token {}", profile.masked_token()));
            if !profile.flags.is_empty() {
                let flags: Vec<&str> = profile.flags.iter().map(|f| f.as_str()).collect();
                output::dimmed(&format!("    flags {}", flags.join(", ")));
            }
        }
    }

    Ok(())
}

/// Remove a sync profile.
pub fn remove(ctx: &Context, name: &str) -> Result<()> {
    let mut config = ctx.load_config()?;
    let removed = ProfileStore::new(&mut config).remove(name)?;
    output::success(&format!(
        "removed profile {} ({})",
        output::key(&removed.name),
        removed.sync
    ));
    Ok(())
}

/// Update fields of a sync profile.
pub fn update(
    ctx: &Context,
    name: &str,
    sync: Option<SyncTarget>,
    token: Option<String>,
    url: Option<String>,
    flags: Option<Vec<String>>,
) -> Result<()> {
    let flags = flags.as_deref().map(parse_flags).transpose()?;
    if sync.is_none() && token.is_none() && url.is_none() && flags.is_none() {
        return Err(ValidationError::NothingToUpdate.into());
    }

    let mut config = ctx.load_config()?;
    ProfileStore::new(&mut config).update(
        name,
        ProfileUpdate {
            sync,
            token,
            url,
            flags,
        },
    )?;

    output::success(&format!("updated profile {}", output::key(name)));
    Ok(())
}
