//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{fixture_path, session_fixture, TestEnvironment};

/// Get a command for the csuite-onboard binary
fn onboard_cmd() -> Command {
    Command::cargo_bin("csuite-onboard").unwrap()
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    onboard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("select"))
        .stdout(predicate::str::contains("zodiac"))
        .stdout(predicate::str::contains("new-year"))
        .stdout(predicate::str::contains("library"))
        .stdout(predicate::str::contains("cards"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command() {
    onboard_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("csuite-onboard"))
        .stdout(predicate::str::contains("Target:"))
        .stdout(predicate::str::contains("Compiler:"));
}

#[test]
fn test_version_json() {
    let output = onboard_cmd().args(["version", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["name"], "csuite-onboard");
    assert!(json["git"]["hash"].is_string());
    assert_eq!(json["catalog_digest"].as_str().map(str::len), Some(12));
}

#[test]
fn test_short_version_flag() {
    onboard_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("csuite-onboard"));
}

// ─────────────────────────────────────────────────────────────────
// Calendar Commands
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_new_year_reference_dates() {
    for (year, expected) in [("1900", "1900-01-31"), ("1966", "1966-01-21"), ("2024", "2024-02-10")] {
        onboard_cmd()
            .args(["new-year", year])
            .assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }
}

#[test]
fn test_new_year_outside_range() {
    onboard_cmd()
        .args(["new-year", "1850"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown"));
}

#[test]
fn test_zodiac_before_new_year() {
    onboard_cmd()
        .args(["zodiac", "2024-02-09"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Aquarius"))
        .stdout(predicate::str::contains("Water Rabbit"));
}

#[test]
fn test_zodiac_on_new_year() {
    onboard_cmd()
        .args(["zodiac", "2024-02-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wood Dragon"));
}

#[test]
fn test_zodiac_outside_range_needs_boundary() {
    onboard_cmd()
        .args(["zodiac", "1850-01-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown"))
        .stdout(predicate::str::contains("--boundary"));

    // Born before new year: zodiac year 1849, Earth Rooster
    onboard_cmd()
        .args(["zodiac", "1850-01-15", "--boundary", "yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Earth Rooster"));
}

#[test]
fn test_zodiac_bad_date() {
    let result = onboard_cmd().args(["zodiac", "2024-13-01"]).assert().failure();
    assert_eq!(result.get_output().status.code(), Some(30));
}

// ─────────────────────────────────────────────────────────────────
// Cards and Library
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_cards_reproducible() {
    let first = onboard_cmd().args(["cards", "--seed", "deck"]).output().unwrap();
    let second = onboard_cmd().args(["cards", "--seed", "deck"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let text = String::from_utf8_lossy(&first.stdout);
    assert!(text.contains("Seed: deck"));
    // Three cards plus a blank line and the seed line
    assert_eq!(text.lines().filter(|l| !l.trim().is_empty()).count(), 4);
}

#[test]
fn test_cards_auto_seed() {
    onboard_cmd()
        .arg("cards")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seed: mix-"));
}

#[test]
fn test_library_lists_catalog() {
    let env = TestEnvironment::new();
    env.cmd()
        .arg("library")
        .assert()
        .success()
        .stdout(predicate::str::contains("CEO-Strategist"))
        .stdout(predicate::str::contains("Chairman-Strategic"));
}

#[test]
fn test_library_role_filter() {
    let env = TestEnvironment::new();
    env.cmd()
        .args(["library", "--role", "CFO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CFO-Guardian"))
        .stdout(predicate::str::contains("CEO-Strategist").not());
}

#[test]
fn test_library_export() {
    let env = TestEnvironment::new();
    let out = env.root.path().join("catalog").join("personas.toml");
    env.cmd()
        .args(["library", "--export"])
        .arg(&out)
        .assert()
        .success();
    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("CEO-Diplomat"));
}

// ─────────────────────────────────────────────────────────────────
// Select Command
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_select_table_output() {
    let env = TestEnvironment::new();
    env.cmd()
        .arg("select")
        .arg("--input")
        .arg(session_fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("CEO-Strategist"))
        .stdout(predicate::str::contains("CFO-Guardian"))
        .stdout(predicate::str::contains("Team score: 4.8150"))
        .stdout(predicate::str::contains("governance anchor"))
        .stdout(predicate::str::contains("Seed: fixture-board"));
}

#[test]
fn test_select_json_output() {
    let env = TestEnvironment::new();
    let output = env
        .cmd()
        .arg("select")
        .arg("--input")
        .arg(session_fixture())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["seed_label"], "fixture-board");
    assert_eq!(json["assignment"]["roles"]["CEO"]["persona_id"], "CEO-Strategist");
    assert_eq!(json["assignment"]["roles"]["CFO"]["persona_id"], "CFO-Guardian");
    let score = json["assignment"]["score"].as_f64().unwrap();
    assert!((score - 4.815).abs() < 1e-9);
    assert_eq!(json["assignment"]["breakdown"]["CEO"]["vibe_gate"], 1.0);
    assert_eq!(json["human"]["chinese_zodiac"], "Metal Horse");
}

#[test]
fn test_select_seed_override_is_reproducible() {
    let env = TestEnvironment::new();
    let run = || {
        env.cmd()
            .arg("select")
            .arg("--input")
            .arg(fixture_path("session_full.toml"))
            .args(["--seed", "cli-seed", "--randomness", "high", "--json"])
            .output()
            .unwrap()
    };
    let first = stdout_json(&run());
    let second = stdout_json(&run());
    assert_eq!(first["seed_label"], "cli-seed");
    assert_eq!(first["randomness"], "high");
    assert_eq!(first["assignment"], second["assignment"]);
}

#[test]
fn test_select_missing_session_file() {
    let env = TestEnvironment::new();
    let result = env
        .cmd()
        .args(["select", "--input", "/nonexistent/session.toml"])
        .assert()
        .failure();
    assert_eq!(result.get_output().status.code(), Some(20));
}

#[test]
fn test_select_malformed_session() {
    let env = TestEnvironment::new();
    let session = env.write("bad.toml", "position = \"CEO\"\n[birth]\ndate = \"not-a-date\"\n");
    let result = env
        .cmd()
        .arg("select")
        .arg("--input")
        .arg(&session)
        .assert()
        .failure()
        .stderr(predicate::str::contains("E302"));
    assert_eq!(result.get_output().status.code(), Some(30));
}

#[test]
fn test_select_reports_missing_role() {
    let env = TestEnvironment::new();
    let library = env.write(
        "personas.toml",
        r#"
[[persona]]
id = "CEO-Solo"
role = "CEO"
enneagram = 3
wing = "3w4"
mbti = "ENTJ"
western_zodiac = "Leo"
chinese_zodiac = "Fire Horse"
tags = ["decisive", "execution"]
weight = 0.8
"#,
    );
    let session = std::fs::read_to_string(session_fixture())
        .unwrap()
        .replace("roles = [\"CEO\", \"CFO\"]", "roles = [\"CEO\", \"CTO\"]");
    let session = env.write("session.toml", &session);

    let env = TestEnvironment::with_config(&format!(
        "[selection]\nlibrary = \"{}\"\n",
        library.display()
    ));
    let result = env
        .cmd()
        .arg("select")
        .arg("--input")
        .arg(&session)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CTO"));
    assert_eq!(result.get_output().status.code(), Some(40));
}

#[test]
fn test_invalid_randomness_flag() {
    onboard_cmd()
        .args(["select", "--input", "s.toml", "--randomness", "wild"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wild"));
}
