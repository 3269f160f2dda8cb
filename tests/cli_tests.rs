#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains as str_contains;
use tempfile::TempDir;

#[allow(deprecated)]
fn orthocal() -> Command {
    let mut cmd = Command::cargo_bin("orthocal").expect("orthocal binary");
    cmd.env_remove("ORTHOCAL_DATA_DIR");
    cmd
}

#[test]
fn day_view_shows_feast_fasting_and_readings() {
    orthocal()
        .args(["--date", "2026-04-12"])
        .assert()
        .success()
        .stdout(str_contains("Sunday, April 12, 2026"))
        .stdout(str_contains("Pascha (Resurrection of Christ)"))
        .stdout(str_contains("No Fast"))
        .stdout(str_contains("Gospel:  John 1:1-17 (Feast)"));
}

#[test]
fn simple_view_is_one_line() {
    let assert = orthocal()
        .args(["--date", "2026-08-29", "--simple"])
        .assert()
        .success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(output.lines().count(), 1, "{output}");
    assert!(output.starts_with("2026-08-29 | Beheading of John the Baptist | strict | "));
}

#[test]
fn month_view_lists_notable_feasts() {
    orthocal()
        .args(["--date", "2026-09-01", "--month"])
        .assert()
        .success()
        .stdout(str_contains("September 2026"))
        .stdout(str_contains("Sun   Mon   Tue"))
        .stdout(str_contains("Sep 14 — Elevation of the Holy Cross"));
}

#[test]
fn json_output_parses() {
    let assert = orthocal()
        .args(["--date", "2026-03-25", "--json"])
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json");
    assert_eq!(value["date"], "2026-03-25");
    assert_eq!(value["fasting_level"], "fish");
    assert_eq!(value["pascha_offset"], -18);
}

#[test]
fn json_month_is_a_list() {
    let assert = orthocal()
        .args(["--date", "2026-02-10", "--month", "--json"])
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid json");
    assert_eq!(value.as_array().map(Vec::len), Some(28));
}

#[test]
fn csv_exports_the_whole_month() {
    let assert = orthocal()
        .args(["--date", "2026-12-25", "--csv"])
        .assert()
        .success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(output.starts_with("date,weekday,pascha_offset"));
    assert_eq!(output.lines().count(), 32);
}

#[test]
fn invalid_date_is_rejected() {
    orthocal()
        .args(["--date", "2026-13-01"])
        .assert()
        .failure()
        .stderr(str_contains("use YYYY-MM-DD"));
}

#[test]
fn simple_and_month_conflict() {
    orthocal()
        .args(["--simple", "--month"])
        .assert()
        .failure()
        .stderr(str_contains("cannot be used with"));
}

#[test]
fn missing_data_dir_reports_error_chain() {
    let dir = TempDir::new().unwrap();
    orthocal()
        .args(["--date", "2026-01-01", "--data-dir"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(str_contains("error: loading calendar data from"))
        .stderr(str_contains("failed to read table").and(str_contains("No such file").or(
            predicate::str::contains("cannot find"),
        )));
}

#[test]
fn data_dir_can_come_from_the_environment() {
    let dir = TempDir::new().unwrap();
    let mut cmd = orthocal();
    cmd.env("ORTHOCAL_DATA_DIR", dir.path());
    cmd.args(["--date", "2026-01-01"])
        .assert()
        .code(1)
        .stderr(str_contains("failed to read table"));
}
