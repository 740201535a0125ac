//! Tests for `openv push`.

use crate::support::*;

#[test]
fn test_export_to_file() {
    let t = Test::with_env_file(".env.source", SAMPLE_ENV_COMPLEX);

    let output = t.push_file(".env.source", ".env.out");
    assert_success(&output);
    assert_stdout_contains(&output, "exported 5 variables");

    let contents = t.read(".env.out");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "# Environment variables for github.com/acme/api (staging)"
    );
    assert!(lines[1].starts_with("# Generated by openv"));
    assert_eq!(
        &lines[3..],
        [
            "EXPORTED=yes",
            "HASHED=\"p@ss#word\"",
            "QUOTED=\"quoted value\"",
            "SIMPLE=value",
            "SINGLE_QUOTED=\"single quoted\"",
        ]
    );
}

#[test]
fn test_export_excludes_seed() {
    let t = Test::with_env_file(".env.source", SAMPLE_ENV);

    assert_success(&t.push_file(".env.source", ".env.out"));
    assert!(!t.read(".env.out").contains("__openv_keys"));
}

#[cfg(unix)]
#[test]
fn test_export_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::with_env_file(".env.source", SAMPLE_ENV);
    assert_success(&t.push_file(".env.source", ".env.out"));

    let mode = std::fs::metadata(t.path(".env.out"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_missing_source_file() {
    let t = Test::new();

    let output = t.push_file(".env.missing", ".env.out");
    assert_failure(&output);
    assert_stderr_contains(&output, "no environment variables found");
    assert!(!t.path(".env.out").exists());
}

#[test]
fn test_requires_destination() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run(&[
        "push",
        "--url",
        "https://github.com/acme/api",
        "--env",
        "staging",
        "--from",
        ".env",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no file or profile specified");
}

#[test]
fn test_file_and_profile_conflict() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run(&[
        "push", "--url", "github.com/acme/api", "--env", "dev", "--from", ".env", "--file",
        "out", "--profile", "gh",
    ]);
    assert_failure(&output);
}

#[test]
fn test_unknown_profile() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run(&[
        "push", "--url", "github.com/acme/api", "--env", "dev", "--from", ".env", "--profile",
        "nope",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "profile not found: nope");
}

#[test]
fn test_profile_push_needs_confirmation() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);
    std::fs::write(t.config_path(), CONFIG_WITH_PROFILES).unwrap();

    let output = t.run(&[
        "push",
        "--url",
        "https://github.com/acme/api",
        "--env",
        "staging",
        "--from",
        ".env",
        "--profile",
        "repo-secrets",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "operation cancelled");
    assert_stderr_contains(&output, "--yes");
}

#[test]
fn test_profile_push_rejects_malformed_url() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);
    std::fs::write(t.config_path(), CONFIG_WITH_PROFILES).unwrap();

    let output = t.run(&[
        "push",
        "--url",
        "just-a-name",
        "--env",
        "staging",
        "--from",
        ".env",
        "--profile",
        "repo-secrets",
        "--yes",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid GitHub URL: just-a-name");
}

#[test]
fn test_profile_push_reports_remote_failure() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);
    std::fs::write(t.config_path(), CONFIG_WITH_PROFILES).unwrap();

    let output = t.run(&[
        "push",
        "--url",
        "https://github.com/acme/api",
        "--env",
        "staging",
        "--from",
        ".env",
        "--profile",
        "repo-secrets",
        "-y",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "get public key for acme/api failed");
    assert_stderr_excludes(&output, "value1");
}

#[test]
fn test_environment_profile_resolves_repository_first() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);
    std::fs::write(t.config_path(), CONFIG_WITH_PROFILES).unwrap();

    let output = t.run(&[
        "push",
        "--url",
        "https://github.com/acme/api",
        "--env",
        "staging",
        "--from",
        ".env",
        "--profile",
        "env-vars",
        "--force",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "look up repository acme/api failed");
}
