//! openv - Sync environment variables from 1Password to GitHub.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use openv::cli::output;
use openv::cli::{execute, Cli};
use openv::error::{ConfigError, Error, ProfileError, SourceError, SyncError, ValidationError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("OPENV_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("openv=debug")
        } else if cli.quiet {
            EnvFilter::new("openv=error")
        } else {
            EnvFilter::new("openv=warn")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = hint(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

fn hint(e: &Error) -> Option<&'static str> {
    match e {
        Error::Config(ConfigError::MissingToken) => {
            Some("set op_token in ~/.openv.toml or export OP_SERVICE_ACCOUNT_TOKEN")
        }
        Error::Profile(ProfileError::NotFound(_)) => Some("run: openv profile list"),
        Error::Profile(ProfileError::InactiveSyncType(_))
        | Error::Sync(SyncError::UnimplementedSyncTarget(_)) => {
            Some("only github-* sync types are supported")
        }
        Error::Sync(SyncError::MalformedUrl(_)) => {
            Some("expected a URL like https://github.com/owner/repo")
        }
        Error::Sync(SyncError::PartialCleanup { .. }) => {
            Some("run push again to retry the remaining deletions")
        }
        Error::Source(SourceError::CliMissing) => {
            Some("install the 1Password CLI: https://developer.1password.com/docs/cli")
        }
        Error::Validation(ValidationError::NotConfirmed) => {
            Some("pass --yes to sync without a prompt")
        }
        Error::Validation(ValidationError::NoDestination) => {
            Some("pass --file <PATH> or --profile <NAME>")
        }
        _ => None,
    }
}
