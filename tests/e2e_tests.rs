//! End-to-end tests for depprobe CLI
//!
//! These tests verify:
//! - Exit codes for fatal input errors and for pass/fail verdicts
//! - Text report tags and JSON output schema
//!
//! Tests that need a real interpreter return early when `python3` is absent.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn depprobe() -> Command {
    Command::new(env!("CARGO_BIN_EXE_depprobe"))
}

fn python_available() -> bool {
    std::process::Command::new("python3")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Write a manifest into a fresh directory
fn manifest(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("requirements.txt");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

#[test]
fn test_missing_positionals() {
    depprobe()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_help() {
    depprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--isolate"))
        .stdout(predicate::str::contains("--profile"));
}

#[test]
fn test_missing_manifest_exits_one() {
    let temp_dir = tempfile::tempdir().unwrap();
    depprobe()
        .arg(temp_dir.path().join("requirements.txt"))
        .args(["3.13", "linux", "--quiet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("manifest file not found"));
}

#[test]
fn test_empty_manifest_exits_one() {
    let (_dir, path) = manifest("# only comments\n\n-e .\n");
    depprobe()
        .arg(&path)
        .args(["3.13", "linux", "--quiet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no dependency specifiers"));
}

#[test]
fn test_invalid_config_exits_one() {
    let (dir, path) = manifest("click\n");
    fs::write(dir.path().join("depprobe.toml"), "unknown_key = 1\n").unwrap();
    depprobe()
        .arg(&path)
        .args(["3.13", "linux", "--quiet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_missing_interpreter_exits_one() {
    let (_dir, path) = manifest("click\n");
    depprobe()
        .arg(&path)
        .args(["3.13", "linux", "--quiet"])
        .args(["--python", "definitely-not-an-interpreter-xyz"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to start interpreter"));
}

#[test]
fn test_stdlib_modules_pass() {
    if !python_available() {
        return;
    }
    let (_dir, path) = manifest("json\ncsv\npip\n");
    depprobe()
        .arg(&path)
        .args(["3", "linux", "--no-color", "--python", "python3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[PASS] json"))
        .stdout(predicate::str::contains("[PASS] csv"))
        .stdout(predicate::str::contains("[SKIP] pip"))
        .stdout(predicate::str::contains("Result: PASS"));
}

#[test]
fn test_missing_package_fails() {
    if !python_available() {
        return;
    }
    let (_dir, path) = manifest("json\ndefinitely-not-a-real-package-xyz\n");
    depprobe()
        .arg(&path)
        .args(["3", "linux", "--no-color", "--python", "python3"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[FAIL] definitely-not-a-real-package-xyz -> definitely_not_a_real_package_xyz",
        ))
        .stdout(predicate::str::contains("No module named"))
        .stdout(predicate::str::contains("Result: FAIL"));
}

#[test]
fn test_isolated_mode() {
    if !python_available() {
        return;
    }
    let (_dir, path) = manifest("json\ndefinitely-not-a-real-package-xyz\n");
    depprobe()
        .arg(&path)
        .args(["3", "linux", "--no-color", "--isolate", "--python", "python3"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("isolated interpreter per probe"))
        .stdout(predicate::str::contains("[PASS] json"));
}

#[test]
fn test_json_output_schema() {
    if !python_available() {
        return;
    }
    let (_dir, path) = manifest("json\ndefinitely-not-a-real-package-xyz\n");
    let output = depprobe()
        .arg(&path)
        .args(["3.13", "linux", "--json", "--python", "python3"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["passed"], false);
    assert_eq!(value["total"], 2);
    assert_eq!(value["import_failures"], 1);
    assert_eq!(value["context"]["platform"], "linux");
    assert!(value["context"]["interpreter"]["version"].is_string());
    assert_eq!(value["outcomes"][1]["kind"], "import-failure");
}

#[test]
fn test_repeated_entry_passes_twice() {
    if !python_available() {
        return;
    }
    let (_dir, path) = manifest("json\njson\n");
    let output = depprobe()
        .arg(&path)
        .args(["3", "linux", "--no-color", "--python", "python3"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("[PASS] json").count(), 2);
}

#[test]
fn test_import_time_exception_is_unexpected_failure() {
    if !python_available() {
        return;
    }
    let (dir, path) = manifest("broken-on-import\nquiet-module\n");
    fs::write(dir.path().join("broken_on_import.py"), "raise RuntimeError('boom')\n").unwrap();
    fs::write(dir.path().join("quiet_module.py"), "print('noise')\n").unwrap();

    let output = depprobe()
        .arg(&path)
        .args(["3", "linux", "--json", "--python", "python3"])
        .env("PYTHONPATH", dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["outcomes"][0]["kind"], "unexpected-failure");
    assert!(value["outcomes"][0]["diagnostic"]
        .as_str()
        .unwrap()
        .contains("RuntimeError: boom"));
    assert_eq!(value["outcomes"][1]["kind"], "success");
}

#[test]
fn test_timeout_then_next_entry_passes() {
    if !python_available() {
        return;
    }
    let (dir, path) = manifest("sleeps-forever\njson\n");
    fs::write(
        dir.path().join("sleeps_forever.py"),
        "import time\ntime.sleep(30)\n",
    )
    .unwrap();

    depprobe()
        .arg(&path)
        .args(["3", "linux", "--no-color", "--timeout", "2", "--python", "python3"])
        .env("PYTHONPATH", dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("timed out after 2s"))
        .stdout(predicate::str::contains("[PASS] json"));
}

#[test]
fn test_json_quiet_writes_summary() {
    if !python_available() {
        return;
    }
    let (_dir, path) = manifest("json\npip\ndefinitely-not-a-real-package-xyz\n");
    let output = depprobe()
        .arg(&path)
        .args(["3", "linux", "--json", "--quiet", "--python", "python3"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["failed"], 1);
    assert!(value.get("outcomes").is_none());
    assert_eq!(value["non_success"].as_array().unwrap().len(), 2);
}

#[test]
fn test_verbose_reports_resolver_tables() {
    let (_dir, path) = manifest("click\n");
    depprobe()
        .arg(&path)
        .args(["3.13", "linux", "--verbose"])
        .args(["--python", "definitely-not-an-interpreter-xyz"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Name overrides: "));
}
