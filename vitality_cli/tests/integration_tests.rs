//! Integration tests for the vitality binary.
//!
//! These tests verify end-to-end behavior including:
//! - History loading and snapshot replay
//! - Recovery and condition reports
//! - Checkpoint persistence
//! - Error reporting for bad input

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("vitality"))
}

/// Write a JSON-lines history file and return its path
fn write_history(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("history.jsonl");
    fs::write(&path, lines.join("\n")).expect("Failed to write history");
    path
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("Failed to run vitality");
    assert!(
        output.status.success(),
        "vitality failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Character progression and recovery",
        ));
}

#[test]
fn test_stats_text_output() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[r#"{"date":"2024-03-01","workouts":[{"type":"strength","minutes":60}]}"#],
    );

    cli()
        .arg("stats")
        .arg("--history")
        .arg(&history)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("LEVEL 1"))
        .stdout(predicate::str::contains("Health: "))
        .stdout(predicate::str::contains("Replayed 1 days, 1 workouts"));
}

#[test]
fn test_stats_json_applies_workouts() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[
            r#"{"date":"2024-03-01","workouts":[{"type":"strength","minutes":60}]}"#,
            r#"{"date":"2024-03-02","workouts":[{"type":"rowing","minutes":30}]}"#,
        ],
    );

    let value = json_output(
        cli()
            .arg("--json")
            .arg("stats")
            .arg("--history")
            .arg(&history)
            .arg("--data-dir")
            .arg(temp_dir.path()),
    );

    assert_eq!(value["stats"]["strength"], 9);
    assert_eq!(value["stats"]["level"], 1);
    assert_eq!(value["stats"]["max_health"], 100);
    assert_eq!(value["summary"]["days_replayed"], 2);
    assert_eq!(value["summary"]["workouts_applied"], 1);
    assert_eq!(value["summary"]["workouts_skipped"], 1);
}

#[test]
fn test_default_command_is_stats() {
    let temp_dir = setup_test_dir();
    write_history(
        temp_dir.path(),
        &[r#"{"date":"2024-03-01","workouts":[{"type":"yoga","minutes":30}]}"#],
    );

    // history.jsonl inside the data dir is picked up without --history
    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("LEVEL"));
}

#[test]
fn test_as_of_limits_replay() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[
            r#"{"date":"2024-03-01","workouts":[{"type":"strength","minutes":60}]}"#,
            r#"{"date":"2024-03-05","workouts":[{"type":"strength","minutes":60}]}"#,
        ],
    );

    let value = json_output(
        cli()
            .args(["--json", "stats", "--as-of", "2024-03-02", "--history"])
            .arg(&history)
            .arg("--data-dir")
            .arg(temp_dir.path()),
    );

    assert_eq!(value["summary"]["days_replayed"], 1);
    assert_eq!(value["stats"]["strength"], 9);
}

#[test]
fn test_workouts_csv_merged() {
    let temp_dir = setup_test_dir();
    let history = write_history(temp_dir.path(), &[r#"{"date":"2024-03-01"}"#]);
    let csv_path = temp_dir.path().join("workouts.csv");
    fs::write(
        &csv_path,
        "date,type,category,minutes\n2024-03-01,strength,,60\n2024-03-02,running,cardio,30\n",
    )
    .unwrap();

    let value = json_output(
        cli()
            .arg("--json")
            .arg("--history")
            .arg(&history)
            .arg("--workouts-csv")
            .arg(&csv_path)
            .arg("--data-dir")
            .arg(temp_dir.path())
            .arg("stats"),
    );

    assert_eq!(value["summary"]["days_replayed"], 2);
    assert_eq!(value["summary"]["workouts_applied"], 2);
}

#[test]
fn test_recovery_report() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[
            r#"{"date":"2024-03-01","sleep_minutes":450,"sleep_quality":"good","workouts":[{"type":"strength","minutes":40}],"fatigue_7_days_minutes":150}"#,
        ],
    );

    let value = json_output(
        cli()
            .args(["--json", "recovery", "--date", "2024-03-01", "--history"])
            .arg(&history)
            .arg("--data-dir")
            .arg(temp_dir.path()),
    );

    assert_eq!(value["sleep"], 70);
    assert_eq!(value["workload"], 12);
    assert_eq!(value["fatigue"], 8);
    assert_eq!(value["total"], 50);
    assert_eq!(value["status"], "on_edge");

    cli()
        .args(["recovery", "--history"])
        .arg(&history)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Recovery for 2024-03-01"))
        .stdout(predicate::str::contains("OnEdge"));
}

#[test]
fn test_recovery_missing_date_fails() {
    let temp_dir = setup_test_dir();
    let history = write_history(temp_dir.path(), &[r#"{"date":"2024-03-01"}"#]);

    cli()
        .args(["recovery", "--date", "2024-04-01", "--history"])
        .arg(&history)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no record for 2024-04-01"));
}

#[test]
fn test_conditions_report() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[
            r#"{"date":"2024-03-01","calories_target":2000,"calories_actual":1300,"consecutive_deficit_days":3}"#,
        ],
    );

    let value = json_output(
        cli()
            .args(["--json", "conditions", "--history"])
            .arg(&history)
            .arg("--data-dir")
            .arg(temp_dir.path()),
    );

    assert_eq!(value["date"], "2024-03-01");
    assert_eq!(value["conditions"]["hunger"], "critical");
    assert_eq!(value["conditions"]["thirst"], "low");
    assert!(value["health_impact"]["total"].as_f64().unwrap() < 0.0);
}

#[test]
fn test_partial_records_for_one_day_merge_in_any_order() {
    let nutrition = r#"{"date":"2024-03-01","calories_target":2000,"calories_actual":1400,"consecutive_deficit_days":3}"#;
    let sleep = r#"{"date":"2024-03-01","sleep_minutes":450}"#;

    for lines in [[nutrition, sleep], [sleep, nutrition]] {
        let temp_dir = setup_test_dir();
        let history = write_history(temp_dir.path(), &lines);

        let value = json_output(
            cli()
                .args(["--json", "conditions", "--history"])
                .arg(&history)
                .arg("--data-dir")
                .arg(temp_dir.path()),
        );

        assert_eq!(value["conditions"]["hunger"], "critical");
        assert_eq!(value["conditions"]["sleepiness"], "low");
    }
}

#[test]
fn test_zero_target_is_rejected() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[r#"{"date":"2024-03-01","water_target_ml":0,"water_actual_ml":500}"#],
    );

    cli()
        .args(["conditions", "--history"])
        .arg(&history)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidInput"));
}

#[test]
fn test_missing_history_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("stats")
        .arg("--history")
        .arg(temp_dir.path().join("nope.jsonl"))
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("history file not found"));
}

#[test]
fn test_malformed_lines_skipped() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[
            r#"{"date":"2024-03-01","workouts":[{"type":"strength","minutes":60}]}"#,
            "this is not json",
            "",
            r#"{"date":"2024-03-02"}"#,
        ],
    );

    let value = json_output(
        cli()
            .args(["--json", "stats", "--history"])
            .arg(&history)
            .arg("--data-dir")
            .arg(temp_dir.path()),
    );

    assert_eq!(value["summary"]["days_replayed"], 2);
}

#[test]
fn test_checkpoint_written_and_reused() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[r#"{"date":"2024-03-01","workouts":[{"type":"strength","minutes":60}]}"#],
    );

    let first = json_output(
        cli()
            .args(["--json", "stats", "--checkpoint", "--history"])
            .arg(&history)
            .arg("--data-dir")
            .arg(temp_dir.path()),
    );
    assert!(temp_dir.path().join("checkpoint.json").exists());

    // Append a day and resume
    let history = write_history(
        temp_dir.path(),
        &[
            r#"{"date":"2024-03-01","workouts":[{"type":"strength","minutes":60}]}"#,
            r#"{"date":"2024-03-02","workouts":[{"type":"strength","minutes":60}]}"#,
        ],
    );

    let resumed = json_output(
        cli()
            .args(["--json", "stats", "--checkpoint", "--history"])
            .arg(&history)
            .arg("--data-dir")
            .arg(temp_dir.path()),
    );
    let full = json_output(
        cli()
            .args(["--json", "stats", "--history"])
            .arg(&history)
            .arg("--data-dir")
            .arg(temp_dir.path()),
    );

    assert_eq!(first["summary"]["days_replayed"], 1);
    assert_eq!(resumed, full);
    assert_eq!(resumed["summary"]["days_replayed"], 2);
}

#[test]
fn test_corrupt_checkpoint_ignored() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[r#"{"date":"2024-03-01","workouts":[{"type":"strength","minutes":60}]}"#],
    );
    fs::write(temp_dir.path().join("checkpoint.json"), "{ not valid").unwrap();

    let value = json_output(
        cli()
            .args(["--json", "stats", "--checkpoint", "--history"])
            .arg(&history)
            .arg("--data-dir")
            .arg(temp_dir.path()),
    );

    assert_eq!(value["stats"]["strength"], 9);
}

#[test]
fn test_policy_flag_accepted() {
    let temp_dir = setup_test_dir();
    let history = write_history(
        temp_dir.path(),
        &[r#"{"date":"2024-03-01","workouts":[{"type":"running","minutes":30}]}"#],
    );

    cli()
        .args(["stats", "--policy", "uniform-latest", "--history"])
        .arg(&history)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .args(["stats", "--policy", "sometimes", "--history"])
        .arg(&history)
        .assert()
        .failure();
}

#[test]
fn test_levels_table() {
    cli()
        .args(["levels", "--up-to", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Level"))
        .stdout(predicate::str::contains("400"));

    let value = json_output(cli().args(["--json", "levels", "--up-to", "3"]));
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1]["xp_required"], 100);
    assert_eq!(rows[2]["max_health"], 110);
}
