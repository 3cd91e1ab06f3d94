//! Integration tests for the `fairbill` binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const REFERENCE_LOG: &str = "
14:02:03 ALICE99 Start
14:02:05 CHARLIE End
14:02:34 ALICE99 End
14:02:58 ALICE99 Start
14:03:02 CHARLIE Start
14:03:33 ALICE99 Start
14:03:35 ALICE99 End
14:03:37 CHARLIE End
14:04:05 ALICE99 End
14:04:23 ALICE99 End
14:04:41 CHARLIE Start";

/// Runs `fairbill` with an isolated home so no user config leaks in.
fn fairbill(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fairbill"))
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run fairbill")
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

/// Test the reference log produces the expected per-customer totals.
#[test]
fn test_report_reference_log() {
    let temp = TempDir::new().unwrap();
    let log = write_file(temp.path(), "sessions.log", REFERENCE_LOG);

    let output = fairbill(temp.path(), &[log.as_str()]);

    assert!(
        output.status.success(),
        "fairbill should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ALICE99 4 240\nCHARLIE 3 37\n"
    );
}

/// Test JSON output via the command-line flag.
#[test]
fn test_report_json_flag() {
    let temp = TempDir::new().unwrap();
    let log = write_file(temp.path(), "sessions.log", REFERENCE_LOG);

    let output = fairbill(temp.path(), &["--json", "--date", "2024-06-24", log.as_str()]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["name"], "ALICE99");
    assert_eq!(value[0]["sessions"], 4);
    assert_eq!(value[0]["seconds"], 240);
    assert_eq!(value[1]["name"], "CHARLIE");
    assert_eq!(value[1]["sessions"], 3);
    assert_eq!(value[1]["seconds"], 37);
}

/// Test the format can come from a config file.
#[test]
fn test_report_format_from_config_file() {
    let temp = TempDir::new().unwrap();
    let log = write_file(temp.path(), "sessions.log", "10:00:00 BOB Start\n10:01:00 BOB End\n");
    let config = write_file(temp.path(), "config.toml", "format = \"json\"\n");

    let output = fairbill(temp.path(), &["--config", config.as_str(), log.as_str()]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "name": "BOB", "sessions": 1, "seconds": 60 }])
    );
}

/// Test a missing log fails, names the path, and prints no report.
#[test]
fn test_missing_log_fails_without_report() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("non_existent_file.txt");
    let missing = missing.to_string_lossy().into_owned();

    let output = fairbill(temp.path(), &[missing.as_str()]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "no report should be printed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(&format!("log file not found: {missing}")),
        "stderr should name the missing path: {stderr}"
    );
}

/// Test verbose diagnostics stay off stdout.
#[test]
fn test_verbose_logs_go_to_stderr() {
    let temp = TempDir::new().unwrap();
    let log = write_file(temp.path(), "sessions.log", REFERENCE_LOG);

    let output = fairbill(temp.path(), &["--verbose", log.as_str()]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ALICE99 4 240\nCHARLIE 3 37\n"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("reconciled session log"));
}
