//! Integration tests for the txpar binary and its output formats

use predicates::prelude::*;
use std::io::Write;

const FIXTURE: &str = "tests/fixtures/bank_transfer.jsonl";

fn txpar() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("txpar")
}

#[test]
fn test_parallelism_text_output() {
    txpar()
        .args(["parallelism", "-i", FIXTURE, "-t", "bank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== bank ==="))
        .stdout(predicate::str::contains("threads alive"))
        .stdout(predicate::str::contains("slots: 3  processes: 3  peak: 2"));
}

#[test]
fn test_parallelism_json_parses() {
    let output = txpar()
        .args(["parallelism", "-i", FIXTURE, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["format"], "txpar-json-v1");
    assert_eq!(parsed["title"], "Timeline");
    assert_eq!(parsed["load"]["instance_records"], 6);
    assert_eq!(parsed["parallelism"]["parallelism"], serde_json::json!([2, 1, 1]));
    assert_eq!(parsed["parallelism"]["liveness"], serde_json::json!([3, 2, 1]));
    assert_eq!(parsed["parallelism"]["instances_per_pid"][2]["instances"], 3);
}

#[test]
fn test_parallelism_csv_from_stdin() {
    let input = std::fs::read_to_string(FIXTURE).unwrap();
    txpar()
        .args(["parallelism", "--format", "csv", "-j", "2", "--approximate"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("slot,parallelism,liveness,approximate\n0,2,3,2\n1,1,2,1\n2,1,1,1\n");
}

#[test]
fn test_distribution_csv() {
    txpar()
        .args(["distribution", "-i", FIXTURE, "--format", "csv"])
        .assert()
        .success()
        .stdout("parallelism,slots,cumulative\n1,2,0.666667\n2,1,1.000000\n");
}

#[test]
fn test_timeline_time_window() {
    let output = txpar()
        .args(["timeline", "-i", FIXTURE, "-m", "3", "-M", "4", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["timeline"]["segments"].as_array().unwrap().len(), 5);
    assert_eq!(parsed["timeline"]["min_x"], 3.0);
    assert_eq!(parsed["timeline"]["max_y"], 16);
}

#[test]
fn test_timeline_ordinal_window_csv() {
    txpar()
        .args(["timeline", "-i", FIXTURE, "-c", "2", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0,1,commit,1.5,4,blue,1"))
        .stdout(predicate::str::contains("1,2,abort,2.5,3,red,1"))
        .stdout(predicate::str::contains("2,3,lock,2,2.6,black,1"));
}

#[test]
fn test_zero_first_count_uses_time_window() {
    let output = txpar()
        .args(["timeline", "-i", FIXTURE, "-m", "3", "-M", "4", "-c", "0", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["timeline"]["segments"].as_array().unwrap().len(), 5);
    assert_eq!(parsed["timeline"]["min_x"], 3.0);
}

#[test]
fn test_non_string_type_records_are_skipped() {
    let input = std::fs::read_to_string(FIXTURE).unwrap();
    let skipped = "{\"type\":5,\"pid\":9}\n";
    let output = txpar()
        .args(["parallelism", "--format", "json"])
        .write_stdin(format!("{}{}", input, skipped))
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["load"]["ignored_records"], 3);
    assert_eq!(parsed["parallelism"]["parallelism"], serde_json::json!([2, 1, 1]));
}

#[test]
fn test_config_file_sets_title_and_workers() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "title = \"from config\"\nworkers = 2").unwrap();

    txpar()
        .args(["parallelism", "-i", FIXTURE, "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("=== from config ==="));
}

#[test]
fn test_empty_trace_is_not_an_error() {
    txpar()
        .args(["parallelism", "--format", "csv"])
        .write_stdin("{\"type\":\"header\"}\n")
        .assert()
        .success()
        .stdout("slot,parallelism,liveness\n");
}

#[test]
fn test_malformed_line_fails() {
    txpar()
        .args(["parallelism"])
        .write_stdin("{\"type\":\"instances\",\"pid\":1}\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load trace"));
}

#[test]
fn test_missing_file_fails() {
    txpar()
        .args(["parallelism", "-i", "/nonexistent/trace.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/trace.jsonl"));
}

#[test]
fn test_zero_workers_rejected() {
    txpar()
        .args(["parallelism", "-i", FIXTURE, "-j", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers must be >= 1"));
}
