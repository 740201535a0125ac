//! Test support utilities for openv integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working dir and home dir. Child processes use
/// `.current_dir()` and an explicit `HOME`, so tests can run in parallel.
pub struct Test {
    /// Temporary working directory
    pub dir: TempDir,
    /// Temporary home directory holding `.openv.toml`
    pub home: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with a `.env` file in the working dir.
    pub fn with_env_file(name: &str, contents: &str) -> Self {
        let t = Self::new();
        t.write(name, contents);
        t
    }

    /// Write a file into the working dir and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Path inside the working dir.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Read a file from the working dir.
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("failed to read file")
    }

    /// The config file the binary reads.
    pub fn config_path(&self) -> PathBuf {
        self.home.path().join(".openv.toml")
    }

    pub fn config(&self) -> String {
        std::fs::read_to_string(self.config_path()).unwrap_or_default()
    }
}
