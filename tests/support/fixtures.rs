//! Test fixtures and constants.

/// Sample .env file content.
pub const SAMPLE_ENV: &str = "KEY1=value1\nKEY2=value2\nKEY3=value3\n";

/// Sample .env with edge cases.
pub const SAMPLE_ENV_COMPLEX: &str = r#"
# This is a comment
SIMPLE=value
QUOTED="quoted value"
SINGLE_QUOTED='single quoted'
export EXPORTED=yes

# Another comment
HASHED="p@ss#word"
"#;

/// Config with one profile of each storage kind.
pub const CONFIG_WITH_PROFILES: &str = r#"
[[sync_profiles]]
name = "repo-secrets"
sync = "github-repo-secret"
token = "ghp_repo_abcdef"
url = "https://github.com"

[[sync_profiles]]
name = "env-vars"
sync = "github-environment-variable"
token = "ghp_env_123456"
url = "https://github.com"
flags = ["prefix-with-env"]
"#;
