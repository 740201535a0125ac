//! Run command.
//!
//! Executes a command with an environment's variables injected.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::resolve::Context;
use crate::core::constants::MANIFEST_SEED_KEY;
use crate::core::types::{PlainValue, VarName};
use crate::error::{Result, ValidationError};

/// Run a command with the environment for `url` and `env` injected, exiting
/// with the child's status.
pub fn execute(
    ctx: &Context,
    url: &str,
    env: &str,
    from: Option<&Path>,
    vault: Option<&str>,
    command: Option<&str>,
    args: &[String],
) -> Result<()> {
    let mut cmd = build_command(command, args)?;

    let config = ctx.load_config()?;
    let (_, environment) = ctx.fetch(&config, url, env, from, vault)?;

    let code = run_with_env(&mut cmd, environment.variables)?;
    std::process::exit(code);
}

/// `sh -c <line>` for a command line, otherwise the program and its args.
fn build_command(command: Option<&str>, args: &[String]) -> Result<Command> {
    if let Some(line) = command.filter(|c| !c.trim().is_empty()) {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        return Ok(cmd);
    }

    let (program, rest) = args.split_first().ok_or(ValidationError::NoCommand)?;
    let mut cmd = Command::new(program);
    cmd.args(rest);
    Ok(cmd)
}

/// Spawn `cmd` with `variables` added to the inherited environment.
fn run_with_env(cmd: &mut Command, variables: BTreeMap<VarName, PlainValue>) -> Result<i32> {
    for (key, value) in variables {
        if key == MANIFEST_SEED_KEY {
            continue;
        }
        let value = Zeroizing::new(value);
        cmd.env(key, value.as_str());
    }

    debug!(program = ?cmd.get_program(), "spawning");
    let status = cmd.status()?;
    Ok(status.code().unwrap_or(1))
}
