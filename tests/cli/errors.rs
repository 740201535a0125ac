//! Tests for error handling and CLI flags.

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.run(&["--help"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("push"));
    assert!(out.contains("profile"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.run(&["unknown-command"]);
    assert_failure(&output);
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.run(&["--version"]);
    assert_success(&output);
    assert_stdout_contains(&output, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let t = Test::new();

    let output = t.run(&["--verbose", "--quiet", "profile", "list"]);
    assert_failure(&output);
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.run(&["completions", "bash"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("_openv") || out.contains("complete"));
}

#[test]
fn test_completions_zsh() {
    let t = Test::new();

    let output = t.run(&["completions", "zsh"]);
    assert_success(&output);
    assert!(!stdout(&output).is_empty());
}

#[test]
fn test_errors_print_cross_and_exit_one() {
    let t = Test::new();

    let output = t.run(&["profile", "remove", "nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "✗ profile not found: nope");
    assert_stderr_contains(&output, "→ run: openv profile list");
}

#[test]
fn test_malformed_config_is_reported() {
    let t = Test::new();
    std::fs::write(t.config_path(), "sync_profiles = 3").unwrap();

    let output = t.profile_list();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config file");
}

#[test]
fn test_config_flag_overrides_home() {
    let t = Test::new();
    let custom = t.path("custom.toml");

    let output = t.run(&[
        "--config",
        custom.to_str().unwrap(),
        "profile",
        "add",
        "gh",
        "--sync",
        "github-repo-secret",
        "--token",
        "ghp_x",
        "--url",
        "https://github.com",
    ]);
    assert_success(&output);
    assert!(custom.exists());
    assert!(!t.config_path().exists());
}

#[test]
fn test_missing_token_without_terminal() {
    let t = Test::new();

    let output = t.run(&[
        "push",
        "--url",
        "https://github.com/acme/api",
        "--env",
        "staging",
        "--file",
        ".env.out",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no 1Password token");
}
