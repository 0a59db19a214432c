//! Tests for the fleetrisk command-line interface.

mod common;

use assert_cmd::Command;
use common::write_fixture;
use fleetrisk::testkit::{entities_json, reference_time, sample_fleet, EntityBuilder};
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

const AS_OF: &str = "2024-06-01T00:00:00Z";

fn fleetrisk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fleetrisk").expect("binary should build");
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("FLEETRISK_LOG");
    cmd
}

/// Temp dir holding a fleet file and an empty config so discovery never
/// picks up a stray `.fleetrisk.toml` from a parent directory.
fn workspace(size: usize) -> TempDir {
    let temp = TempDir::new().unwrap();
    write_fixture(
        temp.path(),
        "fleet.json",
        &entities_json(&sample_fleet(size, reference_time())),
    );
    write_fixture(temp.path(), ".fleetrisk.toml", "");
    temp
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to execute fleetrisk");
    assert!(
        output.status.success(),
        "fleetrisk failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_classify_json_output() {
    let temp = workspace(12);

    let stdout = stdout_of(fleetrisk(&temp).args([
        "classify",
        "fleet.json",
        "--format",
        "json",
        "--as-of",
        AS_OF,
    ]));

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["summary"]["unit_count"], 12);
    let entities = report["entities"].as_array().unwrap();
    assert_eq!(entities.len(), 12);
    assert!(entities
        .iter()
        .all(|e| ["HIGH", "MED", "LOW"].contains(&e["classification"]["tier"].as_str().unwrap())));
}

#[test]
fn test_classify_markdown_to_file() {
    let temp = workspace(6);

    fleetrisk(&temp)
        .args([
            "classify",
            "fleet.json",
            "--format",
            "markdown",
            "--output",
            "report.md",
            "--as-of",
            AS_OF,
        ])
        .assert()
        .success();

    let report = fs::read_to_string(temp.path().join("report.md")).unwrap();
    assert!(report.starts_with("# Fleet Risk Report"));
    assert!(report.contains("## Summary"));
    assert!(report.contains("| Units | 6 |"));
    assert!(!report.contains('\u{1b}'));
}

#[test]
fn test_classify_plain_terminal_has_no_escape_codes() {
    let temp = workspace(6);

    let stdout = stdout_of(fleetrisk(&temp).args([
        "classify",
        "fleet.json",
        "--plain",
        "--as-of",
        AS_OF,
    ]));

    assert!(stdout.contains("FLEET RISK REPORT"));
    assert!(stdout.contains("unit-00000"));
    assert!(!stdout.contains('\u{1b}'));
}

#[test]
fn test_classify_reads_stdin() {
    let temp = workspace(0);
    let input = entities_json(&[EntityBuilder::healthy("from-stdin", reference_time()).build()]);

    let stdout = stdout_of(
        fleetrisk(&temp)
            .args(["classify", "-", "--format", "json", "--as-of", "2024-06-01"])
            .write_stdin(input),
    );

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["entities"][0]["entity"]["id"], "from-stdin");
    assert_eq!(report["entities"][0]["classification"]["tier"], "LOW");
}

#[test]
fn test_classify_uses_config_thresholds() {
    let temp = workspace(0);
    let input = entities_json(&[EntityBuilder::healthy("busy", reference_time())
        .primary(|t| t.vph = Some(3.0))
        .build()]);
    write_fixture(temp.path(), "fleet.json", &input);
    write_fixture(
        temp.path(),
        "relaxed.toml",
        indoc! {r#"
            [thresholds]
            low_vph = 3.5
        "#},
    );

    let default_run = stdout_of(fleetrisk(&temp).args([
        "classify", "fleet.json", "-f", "json", "--as-of", AS_OF,
    ]));
    let relaxed_run = stdout_of(fleetrisk(&temp).args([
        "classify",
        "fleet.json",
        "-f",
        "json",
        "--as-of",
        AS_OF,
        "--config",
        "relaxed.toml",
    ]));

    let tier = |stdout: &str| {
        let report: serde_json::Value = serde_json::from_str(stdout).unwrap();
        report["entities"][0]["classification"]["tier"]
            .as_str()
            .unwrap()
            .to_string()
    };
    assert_eq!(tier(&default_run), "MED");
    assert_eq!(tier(&relaxed_run), "LOW");
}

#[test]
fn test_classify_rejects_malformed_input() {
    let temp = workspace(0);
    write_fixture(temp.path(), "broken.json", "{ not json");

    let output = fleetrisk(&temp)
        .args(["classify", "broken.json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.json"));
}

#[test]
fn test_classify_rejects_bad_as_of() {
    let temp = workspace(1);

    fleetrisk(&temp)
        .args(["classify", "fleet.json", "--as-of", "last tuesday"])
        .assert()
        .failure();
}

#[test]
fn test_init_creates_config_and_refuses_overwrite() {
    let temp = TempDir::new().unwrap();

    fleetrisk(&temp).arg("init").assert().success();
    let contents = fs::read_to_string(temp.path().join(".fleetrisk.toml")).unwrap();
    assert!(contents.contains("[thresholds]"));
    assert!(contents.contains("med_ra_vph = 3.5"));

    fleetrisk(&temp).arg("init").assert().failure();
    fleetrisk(&temp).args(["init", "--force"]).assert().success();
}

#[test]
fn test_thresholds_command_applies_preset_then_config() {
    let temp = workspace(0);
    write_fixture(
        temp.path(),
        "override.toml",
        indoc! {r#"
            [thresholds]
            low_vph = 1.75
        "#},
    );

    let stdout = stdout_of(fleetrisk(&temp).args([
        "thresholds",
        "--preset",
        "strict",
        "--config",
        "override.toml",
    ]));

    assert!(stdout.starts_with("[thresholds]"));
    assert!(stdout.contains("low_vph = 1.75"));
    assert!(stdout.contains("low_scan_age_enabled = 1.0"));
}
