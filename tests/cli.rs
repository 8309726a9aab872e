use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).expect("create input file");
    file.write_all(contents.as_bytes()).expect("write input");
    path
}

fn sample_csv(dir: &TempDir) -> PathBuf {
    write_file(
        dir,
        "sample.csv",
        "intfield,charfield\n5,fixedlength\n10,fixedlength\n",
    )
}

#[test]
fn profile_renders_table_with_field_and_type_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = sample_csv(&dir);

    Command::cargo_bin("csv-profile")
        .expect("binary exists")
        .args(["profile", "-i", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            contains("field")
                .and(contains("intfield"))
                .and(contains("charfield"))
                .and(contains("mean"))
                .and(contains("sample: fixedlength")),
        );
}

#[test]
fn profile_emits_json_statistics() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = sample_csv(&dir);

    let output = Command::cargo_bin("csv-profile")
        .expect("binary exists")
        .args(["profile", "-i", path.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(parsed["intfield"]["int"]["count"], 2);
    assert_eq!(parsed["intfield"]["int"]["min"], 5);
    assert_eq!(parsed["intfield"]["int"]["max"], 10);
    assert_eq!(parsed["intfield"]["int"]["mean"], 7.5);
    assert_eq!(parsed["charfield"]["str"]["count"], 2);
    assert_eq!(parsed["charfield"]["str"]["min"], 11);
    assert_eq!(parsed["charfield"]["str"]["sample"][0], "fixedlength");
}

#[test]
fn conflicts_reports_only_multi_type_fields() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_file(
        &dir,
        "mixed.txt",
        "clean|dirty\n1|10\n2|oops\n",
    );

    let output = Command::cargo_bin("csv-profile")
        .expect("binary exists")
        .args([
            "conflicts",
            "-i",
            path.to_str().unwrap(),
            "--delimiter",
            "pipe",
            "--format",
            "json",
        ])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let object = parsed.as_object().expect("JSON object");
    assert_eq!(object.len(), 1);
    assert_eq!(parsed["dirty"]["int"]["count"], 1);
    assert_eq!(parsed["dirty"]["str"]["count"], 1);
}

#[test]
fn conflicts_on_consistent_corpus_is_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = sample_csv(&dir);

    let output = Command::cargo_bin("csv-profile")
        .expect("binary exists")
        .args(["conflicts", "-i", path.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(parsed, serde_json::json!({}));
}

#[test]
fn missing_input_file_fails_with_error() {
    Command::cargo_bin("csv-profile")
        .expect("binary exists")
        .args(["profile", "-i", "/nonexistent/input.csv"])
        .assert()
        .failure()
        .stderr(contains("/nonexistent/input.csv"));
}

#[test]
fn rejects_multi_character_delimiter() {
    Command::cargo_bin("csv-profile")
        .expect("binary exists")
        .args(["profile", "-i", "whatever.csv", "--delimiter", "||"])
        .assert()
        .failure()
        .stderr(contains("single character"));
}
