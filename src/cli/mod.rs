//! Command-line interface.

pub mod completions;
pub mod import;
pub mod output;
pub mod profile;
pub mod push;
pub mod resolve;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::dispatch::SyncTarget;
use crate::error::Result;

use self::resolve::Context;

/// openv - Sync environment variables from 1Password to GitHub.
#[derive(Parser)]
#[command(
    name = "openv",
    about = "Sync environment variables from 1Password to GitHub",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Config file (defaults to ~/.openv.toml)
    #[arg(long, global = true, env = "OPENV_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 1Password service account token
    #[arg(
        long,
        global = true,
        env = "OP_SERVICE_ACCOUNT_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub op_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Push an environment to a file or a sync profile
    Push {
        /// Repository URL (e.g. https://github.com/acme/api)
        #[arg(long)]
        url: String,
        /// Environment name
        #[arg(short, long)]
        env: String,
        /// Write a .env file instead of syncing
        #[arg(short, long, conflicts_with = "profile", value_name = "PATH")]
        file: Option<PathBuf>,
        /// Sync profile to push to
        #[arg(short, long)]
        profile: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long, visible_alias = "force")]
        yes: bool,
        /// 1Password vault to read from
        #[arg(long)]
        vault: Option<String>,
        /// Read from a .env file instead of 1Password
        #[arg(long, value_name = "PATH")]
        from: Option<PathBuf>,
        /// Abort the sync after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Run a command with an environment injected
    Run {
        /// Repository URL
        #[arg(long)]
        url: String,
        /// Environment name
        #[arg(short, long)]
        env: String,
        /// Shell command line, run with `sh -c`
        #[arg(short, long)]
        command: Option<String>,
        /// 1Password vault to read from
        #[arg(long)]
        vault: Option<String>,
        /// Read from a .env file instead of 1Password
        #[arg(long, value_name = "PATH")]
        from: Option<PathBuf>,
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Store a .env file in 1Password
    Import {
        /// Repository URL
        #[arg(long)]
        url: String,
        /// Environment name
        #[arg(short, long)]
        env: String,
        /// Path to the .env file
        #[arg(short, long, value_name = "PATH")]
        file: PathBuf,
        /// Sync profiles to record on the item
        #[arg(long = "sync", value_delimiter = ',', value_name = "PROFILE")]
        sync: Vec<String>,
        /// 1Password vault to write to
        #[arg(long)]
        vault: Option<String>,
    },

    /// Manage sync profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Profile subcommands.
#[derive(Subcommand)]
pub enum ProfileAction {
    /// Add a sync profile
    Add {
        /// Profile name
        name: Option<String>,
        /// Sync type (e.g. github-repo-secret)
        #[arg(long)]
        sync: Option<SyncTarget>,
        /// Platform token
        #[arg(long)]
        token: Option<String>,
        /// Platform URL
        #[arg(long)]
        url: Option<String>,
        /// Profile flags (e.g. prefix-with-env)
        #[arg(long = "flag", value_delimiter = ',')]
        flags: Vec<String>,
    },

    /// List sync profiles
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a sync profile
    Remove {
        /// Profile name
        name: String,
    },

    /// Update a sync profile
    Update {
        /// Profile name
        name: String,
        /// New sync type
        #[arg(long)]
        sync: Option<SyncTarget>,
        /// New platform token
        #[arg(long)]
        token: Option<String>,
        /// New platform URL
        #[arg(long)]
        url: Option<String>,
        /// Replace the profile flags
        #[arg(long = "flag", value_delimiter = ',')]
        flags: Option<Vec<String>>,
        /// Remove all flags
        #[arg(long, conflicts_with = "flags")]
        clear_flags: bool,
    },
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    use Command::*;

    let ctx = Context::new(cli.config, cli.op_token);

    match cli.command {
        Push {
            url,
            env,
            file,
            profile,
            yes,
            vault,
            from,
            timeout,
        } => push::execute(
            &ctx,
            push::PushArgs {
                url,
                env,
                file,
                profile,
                yes,
                vault,
                from,
                timeout,
            },
        ),
        Run {
            url,
            env,
            command,
            vault,
            from,
            args,
        } => run::execute(
            &ctx,
            &url,
            &env,
            from.as_deref(),
            vault.as_deref(),
            command.as_deref(),
            &args,
        ),
        Import {
            url,
            env,
            file,
            sync,
            vault,
        } => import::execute(&ctx, &url, &env, &file, sync, vault.as_deref()),
        Profile { action } => match action {
            ProfileAction::Add {
                name,
                sync,
                token,
                url,
                flags,
            } => profile::add(&ctx, name, sync, token, url, &flags),
            ProfileAction::List { json } => profile::list(&ctx, json),
            ProfileAction::Remove { name } => profile::remove(&ctx, &name),
            ProfileAction::Update {
                name,
                sync,
                token,
                url,
                flags,
                clear_flags,
            } => {
                let flags = if clear_flags { Some(Vec::new()) } else { flags };
                profile::update(&ctx, &name, sync, token, url, flags)
            }
        },
        Completions { shell } => completions::execute(shell),
    }
}
