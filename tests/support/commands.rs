//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create an openv command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test working directory
    /// - No inherited 1Password token, config override, or log filter
    /// - GitHub requests pointed at an unroutable address
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("openv").expect("failed to find openv binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env_remove("OP_SERVICE_ACCOUNT_TOKEN");
        cmd.env_remove("OPENV_CONFIG");
        cmd.env_remove("OPENV_LOG");
        cmd.env("OPENV_GITHUB_API", "http://127.0.0.1:9");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run `openv` with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run openv")
    }

    /// Shortcut for `openv profile add` with every field given.
    pub fn profile_add(&self, name: &str, sync: &str, flags: &[&str]) -> Output {
        let mut args = vec![
            "profile",
            "add",
            name,
            "--sync",
            sync,
            "--token",
            "ghp_testtoken1234",
            "--url",
            "https://github.com",
        ];
        for flag in flags {
            args.push("--flag");
            args.push(*flag);
        }
        self.run(&args)
    }

    /// Shortcut for `openv profile list`.
    pub fn profile_list(&self) -> Output {
        self.run(&["profile", "list"])
    }

    /// Shortcut for `openv profile list --json`.
    pub fn profile_list_json(&self) -> Output {
        self.run(&["profile", "list", "--json"])
    }

    /// Shortcut for `openv push` to a file, reading a local `.env` file.
    pub fn push_file(&self, from: &str, out: &str) -> Output {
        self.run(&[
            "push",
            "--url",
            "https://github.com/acme/api",
            "--env",
            "staging",
            "--from",
            from,
            "--file",
            out,
        ])
    }

    /// Shortcut for `openv run` reading a local `.env` file.
    pub fn run_with(&self, from: &str, command: &[&str]) -> Output {
        let mut args = vec![
            "run",
            "--url",
            "https://github.com/acme/api",
            "--env",
            "staging",
            "--from",
            from,
            "--",
        ];
        args.extend_from_slice(command);
        self.run(&args)
    }
}
