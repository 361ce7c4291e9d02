//! Configuration system tests
//!
//! Tests configuration loading, validation and the config subcommands

mod common;

use std::fs;
use std::path::PathBuf;

use predicates::prelude::*;
use tempfile::TempDir;

use csuite_onboard::config::{generate_default_config, AppConfig};
use csuite_onboard::scoring::Originality;
use csuite_onboard::selection::RandomnessLevel;
use csuite_onboard::ErrorCode;

use common::{invalid_config_fixture, valid_config_fixture};

/// Test fixture for configuration testing
struct ConfigFixture {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("onboard.toml");
        Self { temp_dir, config_path }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }
}

fn onboard_cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("csuite-onboard").unwrap()
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_minimal_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[selection]\n");

    let config = AppConfig::from_file(&fixture.config_path).unwrap();
    assert_eq!(config.selection.beam_width, 8);
    assert_eq!(config.randomness_level().unwrap(), RandomnessLevel::Medium);
    assert!(config.validate().is_ok());

    onboard_cmd()
        .args(["config", "validate", "--config", fixture.path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid."));
}

#[test]
fn test_valid_fixture() {
    let config = AppConfig::from_file(&valid_config_fixture()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.selection.beam_width, 6);
    assert_eq!(config.randomness_level().unwrap(), RandomnessLevel::Low);
    assert_eq!(config.originality().unwrap(), Originality::Subtle);
    assert_eq!(config.selection.seed.as_deref(), Some("config-seed"));
    assert!(!config.output.show_breakdown);
    assert_eq!(config.logging.rotation, "hourly");
    assert_eq!(config.logging.max_files, 3);
}

#[test]
fn test_generated_default_config_is_valid() {
    let fixture = ConfigFixture::new();
    fixture.write_config(&generate_default_config());
    let config = AppConfig::from_file(&fixture.config_path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.output.format, "table");
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_fixture() {
    let config = AppConfig::from_file(&invalid_config_fixture()).unwrap();
    let err = config.validate().unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigValidation);

    let result = onboard_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(invalid_config_fixture())
        .assert()
        .failure()
        .stderr(predicate::str::contains("E102"));
    assert_eq!(result.get_output().status.code(), Some(10));
}

#[test]
fn test_invalid_originality() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[selection]\noriginality = \"reckless\"\n");
    let config = AppConfig::from_file(&fixture.config_path).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_output_format() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[output]\nformat = \"yaml\"\n");
    let config = AppConfig::from_file(&fixture.config_path).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_malformed_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[selection\nbeam_width = ");

    let result = onboard_cmd()
        .args(["config", "validate", "--config", fixture.path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E101"));
    assert_eq!(result.get_output().status.code(), Some(10));
}

#[test]
fn test_missing_explicit_config() {
    let result = onboard_cmd()
        .args(["library", "--config", "/nonexistent/path/onboard.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config init"));
    assert_eq!(result.get_output().status.code(), Some(10));
}

// ─────────────────────────────────────────────────────────────────
// Config Show Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_custom() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[selection]\nbeam_width = 3\nrandomness_level = \"high\"\n");

    onboard_cmd()
        .args(["config", "show", "--config", fixture.path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("beam_width = 3"))
        .stdout(predicate::str::contains("randomness_level = \"high\""))
        .stdout(predicate::str::contains("[logging]"));
}

// ─────────────────────────────────────────────────────────────────
// Config Init Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_init_creates_file() {
    let fixture = ConfigFixture::new();
    let config_path = fixture.temp_dir.path().join("nested").join("onboard.toml");

    onboard_cmd()
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    assert!(config_path.exists());

    onboard_cmd()
        .args(["config", "validate", "--config"])
        .arg(&config_path)
        .assert()
        .success();
}

#[test]
fn test_config_init_refuses_overwrite() {
    let fixture = ConfigFixture::new();
    fixture.write_config("# keep me\n");

    onboard_cmd()
        .args(["config", "init", "--path", fixture.path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(&fixture.config_path).unwrap(), "# keep me\n");
}

#[test]
fn test_config_init_force_overwrite() {
    let fixture = ConfigFixture::new();
    fixture.write_config("# replace me\n");

    onboard_cmd()
        .args(["config", "init", "--force", "--path", fixture.path()])
        .assert()
        .success();

    let content = fs::read_to_string(&fixture.config_path).unwrap();
    assert!(content.contains("[selection]"));
}
