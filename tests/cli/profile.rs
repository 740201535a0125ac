//! Tests for `openv profile`.

use crate::support::*;

#[test]
fn test_add_then_list() {
    let t = Test::new();

    let output = t.profile_add("gh", "github-repo-secret", &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "added profile gh");

    let output = t.profile_list();
    assert_success(&output);
    assert_stdout_contains(&output, "gh");
    assert_stdout_contains(&output, "github-repo-secret");
}

#[test]
fn test_list_masks_tokens() {
    let t = Test::new();
    assert_success(&t.profile_add("gh", "github-repo-secret", &[]));

    let output = t.profile_list();
    assert_success(&output);
    assert_stdout_excludes(&output, "ghp_testtoken1234");
    assert_stdout_contains(&output, "1234");

    let output = t.profile_list_json();
    assert_success(&output);
    assert_stdout_excludes(&output, "ghp_testtoken1234");
}

#[test]
fn test_list_json_shape() {
    let t = Test::new();
    assert_success(&t.profile_add("vars", "github-org-variable", &["prefix-with-env"]));

    let output = t.profile_list_json();
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed[0]["name"], "vars");
    assert_eq!(parsed[0]["sync"], "github-org-variable");
    assert_eq!(parsed[0]["flags"][0], "prefix-with-env");
}

#[test]
fn test_list_empty() {
    let t = Test::new();

    let output = t.profile_list();
    assert_success(&output);
    assert_stdout_contains(&output, "no sync profiles");
}

#[test]
fn test_config_written_owner_only() {
    let t = Test::new();
    assert_success(&t.profile_add("gh", "github-repo-secret", &[]));

    let config = t.config();
    assert!(config.contains("[[sync_profiles]]"));
    assert!(config.contains("sync = \"github-repo-secret\""));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(t.config_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_duplicate_name_rejected() {
    let t = Test::new();
    assert_success(&t.profile_add("gh", "github-repo-secret", &[]));

    let output = t.profile_add("gh", "github-repo-variable", &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}

#[test]
fn test_invalid_sync_type_rejected() {
    let t = Test::new();

    let output = t.profile_add("gh", "github-gist", &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not a valid sync type");
}

#[test]
fn test_unimplemented_sync_type_rejected() {
    let t = Test::new();

    let output = t.profile_add("vercel", "vercel-environment-preview", &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not supported yet");
}

#[test]
fn test_invalid_flag_rejected() {
    let t = Test::new();

    let output = t.profile_add("gh", "github-repo-secret", &["shout"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not a valid flag");
}

#[test]
fn test_add_without_fields_fails_non_interactive() {
    let t = Test::new();

    let output = t.run(&["profile", "add"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "profile name cannot be empty");
}

#[test]
fn test_update_and_remove() {
    let t = Test::new();
    assert_success(&t.profile_add("gh", "github-repo-secret", &[]));

    let output = t.run(&["profile", "update", "gh", "--sync", "github-repo-variable"]);
    assert_success(&output);
    assert!(t.config().contains("github-repo-variable"));

    let output = t.run(&["profile", "update", "gh"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "nothing to update");

    let output = t.run(&["profile", "remove", "gh"]);
    assert_success(&output);
    assert_stdout_contains(&output, "removed profile gh");
    assert!(!t.config().contains("github-repo-variable"));
}
