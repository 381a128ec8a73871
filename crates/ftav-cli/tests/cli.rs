use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const COMPLIANT: &str = "Tax Invoice No: INV-001 Date: 15-03-2024 TRN 100123456789012 Total AED 1000.00 VAT AED 50.00 5%";

/// `ftav` isolated from any user configuration file.
fn ftav(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ftav").unwrap();
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

#[test]
fn validate_compliant_invoice_as_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("inv.txt");
    fs::write(&input, COMPLIANT).unwrap();

    ftav(dir.path())
        .args(["validate", "--reference-date", "2024-06-01", "--format", "json"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status": "Approved""#))
        .stdout(predicate::str::contains("All mandatory FTA checks passed."));
}

#[test]
fn verbose_logs_stay_off_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("inv.txt");
    fs::write(&input, COMPLIANT).unwrap();

    let assert = ftav(dir.path())
        .args(["-v", "validate", "--reference-date", "2024-06-01", "--format", "json"])
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Validated inv.txt"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let result: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(result["name"], "inv.txt");
}

#[test]
fn validate_future_date_from_stdin() {
    let dir = TempDir::new().unwrap();

    ftav(dir.path())
        .args(["validate", "--reference-date", "2024-06-01", "-"])
        .write_stdin(COMPLIANT.replace("2024", "2099"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: Not Approved"))
        .stdout(predicate::str::contains("Invoice date is in the future"));
}

#[test]
fn validate_csv_has_header_and_row() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, "").unwrap();

    ftav(dir.path())
        .args(["validate", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice Name,Invoice Type,TRN"))
        .stdout(predicate::str::contains("empty.txt"))
        .stdout(predicate::str::contains("Invoice number missing"));
}

#[test]
fn validate_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    ftav(dir.path())
        .args(["validate", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_exports_every_document() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(&second).unwrap();
    fs::write(first.join("a.txt"), COMPLIANT).unwrap();
    fs::write(first.join("b.txt"), COMPLIANT).unwrap();
    fs::write(second.join("c.txt"), "").unwrap();
    let output = dir.path().join("results.csv");

    ftav(dir.path())
        .args(["batch", "--reference-date", "2024-06-01", "--output"])
        .arg(&output)
        .arg(format!("{}/*.txt", first.display()))
        .arg(format!("{}/*.txt", second.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 rows"));

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("Remarks,Batch_ID"));
    assert!(lines[1].starts_with("a.txt,"));
    assert!(lines[2].contains("Duplicate invoice number within batch"));
    assert!(lines[3].starts_with("c.txt,"));
}

#[test]
fn batch_drop_removes_a_batch() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.txt"), COMPLIANT).unwrap();
    fs::write(dir.path().join("two.log"), "").unwrap();
    let output = dir.path().join("results.json");

    ftav(dir.path())
        .args(["batch", "--drop", "1", "--format", "json", "--output"])
        .arg(&output)
        .arg(format!("{}/*.txt", dir.path().display()))
        .arg(format!("{}/*.log", dir.path().display()))
        .assert()
        .success();

    let rows: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Invoice Name"], "two.log");
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();

    ftav(dir.path())
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ftav.json");

    ftav(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success();

    ftav(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "rules.vat_tolerance", "\"1.0\""])
        .assert()
        .success();

    ftav(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "rules.vat_tolerance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0"));

    ftav(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "rules.no_such_key", "true"])
        .assert()
        .failure();
}
