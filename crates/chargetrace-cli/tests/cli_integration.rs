use assert_cmd::Command;
use chargetrace_testing::fixtures;
use predicates::prelude::*;

fn chargetrace() -> Command {
    Command::cargo_bin("chargetrace").unwrap()
}

#[test]
fn analyze_prints_usage_and_success_rate() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixtures::write_sample(dir.path(), "depot.csv", fixtures::SINGLE_DAY_CSV).unwrap();

    chargetrace()
        .arg("analyze")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("depot.csv"))
        .stdout(predicate::str::contains("Charging"))
        .stdout(predicate::str::contains("Success Rate:"));
}

#[test]
fn analyze_json_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixtures::write_sample(dir.path(), "depot.csv", fixtures::SINGLE_DAY_CSV).unwrap();

    let output = chargetrace()
        .arg("--format")
        .arg("json")
        .arg("analyze")
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["label"], "All Files");
    assert!(view["dashboard"]["funnel_combined"]["charging"].as_u64().unwrap() > 0);
}

#[test]
fn trend_buckets_by_day_across_a_multi_day_span() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixtures::write_sample(dir.path(), "span.csv", fixtures::MULTI_DAY_CSV).unwrap();

    chargetrace()
        .arg("trend")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Jan 5"))
        .stdout(predicate::str::contains("Jan 7"));
}

#[test]
fn network_appends_overall_entry() {
    let dir = tempfile::tempdir().unwrap();
    let json = fixtures::write_sample(dir.path(), "hub.json", &fixtures::sample_payload_json()).unwrap();

    chargetrace()
        .arg("network")
        .arg(&json)
        .assert()
        .success()
        .stdout(predicate::str::contains("EXICOM"))
        .stdout(predicate::str::contains("OVERALL"));
}

#[test]
fn report_renders_paginated_columns() {
    let dir = tempfile::tempdir().unwrap();
    let json = fixtures::write_sample(dir.path(), "hub.json", &fixtures::sample_payload_json()).unwrap();
    let out = dir.path().join("report.txt");

    chargetrace()
        .arg("report")
        .arg(&json)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let rendered = std::fs::read_to_string(&out).unwrap();
    assert!(rendered.contains("===== Page 1"));
    assert!(rendered.contains("COMBINED CHARGER"));
    assert!(rendered.contains("CONNECTOR 1"));
    assert!(rendered.contains("Success Rate: 80% (8 / 10)"));
    assert!(rendered.contains("Period: 2024-01-05 - 2024-01-07"));
}

#[test]
fn filter_flags_are_mutually_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixtures::write_sample(dir.path(), "depot.csv", fixtures::SINGLE_DAY_CSV).unwrap();

    chargetrace()
        .arg("analyze")
        .arg(&csv)
        .arg("--file")
        .arg("depot.csv")
        .arg("--station")
        .arg("MG Road Hub")
        .assert()
        .failure();
}

#[test]
fn batch_with_no_processable_file_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let junk = fixtures::write_sample(dir.path(), "junk.xlsx", "binary").unwrap();

    chargetrace()
        .arg("analyze")
        .arg(&junk)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No file could be processed"));
}

#[test]
fn selecting_a_file_scopes_the_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let a = fixtures::write_sample(dir.path(), "a.csv", fixtures::SINGLE_DAY_CSV).unwrap();
    let b = fixtures::write_sample(dir.path(), "b.csv", fixtures::MULTI_DAY_CSV).unwrap();

    let output = chargetrace()
        .arg("--format")
        .arg("json")
        .arg("analyze")
        .arg(&a)
        .arg(&b)
        .arg("--file")
        .arg("b.csv")
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["label"], "b.csv");
    assert_eq!(view["files"].as_array().unwrap().len(), 2);
}
