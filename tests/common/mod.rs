//! Common test utilities and fixtures
//!
//! This module provides shared test infrastructure

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Get the valid config fixture path
pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

/// Get the invalid config fixture path
pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

/// CEO + CFO session with a direct, decisive vibe
pub fn session_fixture() -> PathBuf {
    fixture_path("session.toml")
}

/// Scratch directory holding a config file and any session files a test writes
pub struct TestEnvironment {
    pub root: TempDir,
    pub config_path: PathBuf,
}

impl TestEnvironment {
    /// Environment with an empty config (all defaults)
    pub fn new() -> Self {
        Self::with_config("")
    }

    pub fn with_config(config_content: &str) -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let config_path = root.path().join("onboard.toml");
        fs::write(&config_path, config_content).expect("Failed to write config");
        Self { root, config_path }
    }

    pub fn config(&self) -> &str {
        self.config_path.to_str().unwrap()
    }

    /// Write a file under the environment root and return its path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Command pointed at this environment's config file
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("csuite-onboard").unwrap();
        cmd.arg("--config").arg(self.config());
        cmd
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_dir_exists() {
        assert!(fixtures_dir().exists(), "Fixtures directory should exist");
    }

    #[test]
    fn test_fixture_files_exist() {
        assert!(valid_config_fixture().exists(), "Valid config fixture should exist");
        assert!(invalid_config_fixture().exists(), "Invalid config fixture should exist");
        assert!(session_fixture().exists(), "Session fixture should exist");
    }
}
