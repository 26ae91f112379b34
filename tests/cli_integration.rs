//! CLI integration tests using assert_cmd to exercise the actual binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pii_extract(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pii-extract").unwrap();
    // Keep the user's global config out of the tests.
    cmd.env("HOME", home);
    cmd
}

fn data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

// ---------------------------------------------------------------------------
// Process subcommand
// ---------------------------------------------------------------------------

#[test]
fn cli_process_all_tasks_to_ndjson() {
    let tmp = TempDir::new().unwrap();
    let infile = tmp.path().join("notes.txt");
    let outfile = tmp.path().join("found.ndjson");
    std::fs::write(&infile, "Reach jane@example.com\n\nServer at 10.1.2.3\n").unwrap();

    pii_extract(tmp.path())
        .args(["process", "--all-tasks", "--show-stats"])
        .arg(&infile)
        .arg(&outfile)
        .assert()
        .success()
        .stderr(predicate::str::contains("EMAIL_ADDRESS"))
        .stderr(predicate::str::contains("2 pii instance(s) written"));

    let written = std::fs::read_to_string(&outfile).unwrap();
    assert_eq!(written.lines().count(), 2);
    assert!(written.contains("\"value\":\"jane@example.com\""));
    assert!(written.contains("\"value\":\"10.1.2.3\""));
}

#[test]
fn cli_process_with_taskfile() {
    let tmp = TempDir::new().unwrap();
    let outfile = tmp.path().join("found.json");

    pii_extract(tmp.path())
        .arg("process")
        .arg(data("minidoc.yaml"))
        .arg(&outfile)
        .arg("--taskfile")
        .arg(data("taskfile.json"))
        .arg("--show-tasks")
        .assert()
        .success()
        .stderr(predicate::str::contains("dashed credit card"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&outfile).unwrap()).unwrap();
    assert_eq!(json["doc_id"], "minidoc");
    let types: Vec<&str> = json["entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["CREDIT_CARD", "BITCOIN_ADDRESS"]);
}

#[test]
fn cli_process_uses_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("extract.yml");
    let infile = tmp.path().join("carta.txt");
    let outfile = tmp.path().join("found.ndjson");
    std::fs::write(&config, "lang: es\ncountry: [es]\ntasks: [GOV_ID]\n").unwrap();
    std::fs::write(&infile, "Mi DNI es 12345678Z.").unwrap();

    pii_extract(tmp.path())
        .arg("process")
        .arg(&infile)
        .arg(&outfile)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let written = std::fs::read_to_string(&outfile).unwrap();
    assert!(written.contains("\"value\":\"12345678Z\""));
    assert!(written.contains("\"country\":\"es\""));
}

#[test]
fn cli_process_unknown_category_fails() {
    let tmp = TempDir::new().unwrap();
    let infile = tmp.path().join("doc.txt");
    std::fs::write(&infile, "text").unwrap();

    pii_extract(tmp.path())
        .args(["process", "--tasks", "SHOE_SIZE"])
        .arg(&infile)
        .arg(tmp.path().join("out.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));
}

#[test]
fn cli_process_bad_taskfile_fails() {
    let tmp = TempDir::new().unwrap();
    let infile = tmp.path().join("doc.txt");
    std::fs::write(&infile, "text").unwrap();

    pii_extract(tmp.path())
        .arg("process")
        .arg(&infile)
        .arg(tmp.path().join("out.json"))
        .arg("--taskfile")
        .arg(data("taskfile-error.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_function"));
}

// ---------------------------------------------------------------------------
// Tasks subcommand
// ---------------------------------------------------------------------------

#[test]
fn cli_tasks_lists_country_definitions() {
    let tmp = TempDir::new().unwrap();

    pii_extract(tmp.path())
        .args(["tasks", "--lang", "en", "--country", "us"])
        .assert()
        .success()
        .stdout(predicate::str::contains("us social security number"))
        .stdout(predicate::str::contains("EMAIL_ADDRESS"))
        .stdout(predicate::str::contains("canadian social insurance number").not());
}

#[test]
fn cli_tasks_all_countries() {
    let tmp = TempDir::new().unwrap();

    pii_extract(tmp.path())
        .args(["tasks", "--lang", "en", "--country", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("us social security number"))
        .stdout(predicate::str::contains("canadian social insurance number"));
}
