//! Tests for `openv run`.

use crate::support::*;

#[cfg(unix)]
#[test]
fn test_injects_variables() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run_with(".env", &["sh", "-c", "printf '%s %s' \"$KEY1\" \"$KEY3\""]);
    assert_success(&output);
    assert_eq!(stdout(&output), "value1 value3");
}

#[cfg(unix)]
#[test]
fn test_command_line_runs_through_shell() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run(&[
        "run",
        "--url",
        "https://github.com/acme/api",
        "--env",
        "staging",
        "--from",
        ".env",
        "--command",
        "printf %s \"$KEY2\"",
    ]);
    assert_success(&output);
    assert_eq!(stdout(&output), "value2");
}

#[cfg(unix)]
#[test]
fn test_exit_code_passthrough() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run_with(".env", &["sh", "-c", "exit 42"]);
    assert_eq!(output.status.code(), Some(42));
}

#[cfg(unix)]
#[test]
fn test_seed_not_injected() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run_with(".env", &["sh", "-c", "test -z \"${__openv_keys+x}\""]);
    assert_success(&output);
}

#[cfg(unix)]
#[test]
fn test_inherits_parent_environment() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t
        .cmd()
        .env("OPENV_PARENT_VAR", "inherited")
        .args([
            "run",
            "--url",
            "https://github.com/acme/api",
            "--env",
            "staging",
            "--from",
            ".env",
            "--",
            "sh",
            "-c",
            "printf %s \"$OPENV_PARENT_VAR\"",
        ])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), "inherited");
}

#[test]
fn test_requires_command() {
    let t = Test::with_env_file(".env", SAMPLE_ENV);

    let output = t.run(&[
        "run",
        "--url",
        "https://github.com/acme/api",
        "--env",
        "staging",
        "--from",
        ".env",
    ]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no command specified");
}
