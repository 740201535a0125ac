//! Tests for `openv import`.
//!
//! The 1Password CLI is never reachable here, so these cover validation that
//! happens before it is invoked.

use crate::support::*;

#[test]
fn test_unknown_sync_profile_rejected() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run(&[
        "import",
        "--url",
        "https://github.com/acme/api",
        "--env",
        "staging",
        "--file",
        ".env",
        "--sync",
        "nope",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "profile not found: nope");
}

#[test]
fn test_missing_file() {
    let t = Test::new();

    let output = t.run(&[
        "import",
        "--url",
        "https://github.com/acme/api",
        "--env",
        "staging",
        "--file",
        ".env.missing",
    ]);
    assert_failure(&output);
}

#[test]
fn test_url_without_repository_rejected() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run(&[
        "import", "--url", "localhost", "--env", "staging", "--file", ".env",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot derive a name from localhost");
}

#[test]
fn test_reports_missing_op_cli() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);
    std::fs::write(t.config_path(), CONFIG_WITH_PROFILES).unwrap();

    let output = t
        .cmd()
        .env("PATH", t.dir.path())
        .args([
            "--op-token",
            "ops_test",
            "import",
            "--url",
            "https://github.com/acme/api",
            "--env",
            "staging",
            "--file",
            ".env",
            "--sync",
            "repo-secrets,env-vars",
        ])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "1Password CLI (op) not found");
    assert_stderr_contains(&output, "install the 1Password CLI");
}
