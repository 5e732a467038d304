//! Integration tests for the outgate CLI
//!
//! These tests run the actual CLI binary and verify output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
fn outgate_cmd() -> Command {
    Command::cargo_bin("outgate").unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_help_flag() {
    outgate_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Validate action output against runner and action output schemas",
        ));
}

#[test]
fn test_check_help_lists_options() {
    outgate_cmd()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--validator"));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_passing_request_masks_secrets() {
    let temp_dir = TempDir::new().unwrap();
    let request = write_file(
        &temp_dir,
        "request.yaml",
        r#"
runner_schema:
  succeeded: {type: boolean}
  result: {type: object}
action_schema:
  token: {type: string, secret: true}
  user: {type: string}
output_key: result
status: succeeded
result:
  succeeded: true
  result:
    token: hunter2
    user: bob
"#,
    );

    outgate_cmd()
        .args(["check", &request])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"token\": \"********\""))
        .stdout(predicate::str::contains("\"user\": \"bob\""))
        .stdout(predicate::str::contains("\"status\": \"succeeded\""))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_check_failing_request_exits_with_gate_code() {
    let temp_dir = TempDir::new().unwrap();
    let request = write_file(
        &temp_dir,
        "request.json",
        r#"{
  "runner_schema": {"stdout": {"type": "string"}},
  "result": {"stdout": 42},
  "output_key": "stdout"
}"#,
    );

    outgate_cmd()
        .args(["check", &request])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"status\": \"failed\""))
        .stdout(predicate::str::contains(
            "Error validating output. See error output for more details.",
        ))
        .stdout(predicate::str::contains("traceback").not());
}

#[test]
fn test_check_without_runner_schema_passes_through() {
    let temp_dir = TempDir::new().unwrap();
    let request = write_file(
        &temp_dir,
        "request.yaml",
        r#"
action_schema:
  token: {type: string, secret: true}
status: running
result:
  result: {token: visible}
"#,
    );

    outgate_cmd()
        .args(["check", &request])
        .assert()
        .success()
        .stdout(predicate::str::contains("visible"))
        .stdout(predicate::str::contains("\"status\": \"running\""));
}

#[test]
fn test_check_with_config_traceback_limit() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_file(&temp_dir, "outgate.yaml", "traceback_limit: 1\n");
    let request = write_file(
        &temp_dir,
        "request.yaml",
        r#"
runner_schema:
  result: {}
action_schema:
  token: not-a-schema
result:
  result: {token: x}
"#,
    );

    outgate_cmd()
        .args(["check", &request, "--config", &config])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"traceback\": \"  in validate_output\\n\""))
        .stdout(predicate::str::contains("OUTGATE-030"));
}

#[test]
fn test_check_validator_flag_selects_draft() {
    // Boolean `required` is only understood by the custom validator
    let temp_dir = TempDir::new().unwrap();
    let request = write_file(
        &temp_dir,
        "request.yaml",
        r#"
runner_schema:
  result: {type: object, required: true}
result: {}
"#,
    );

    outgate_cmd()
        .args(["check", &request, "--validator", "custom"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"status\": \"failed\""));
}

#[test]
fn test_check_rejects_unknown_validator() {
    let temp_dir = TempDir::new().unwrap();
    let request = write_file(&temp_dir, "request.yaml", "result: {}\n");

    outgate_cmd()
        .args(["check", &request, "--validator", "draft3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown validator 'draft3'"));
}

#[test]
fn test_check_missing_file_fails() {
    outgate_cmd()
        .args(["check", "/nonexistent/request.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_check_invalid_request_shows_fix() {
    let temp_dir = TempDir::new().unwrap();
    let request = write_file(&temp_dir, "request.yaml", "status: succeeded\n");

    outgate_cmd()
        .args(["check", &request])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("YAML"))
        .stderr(predicate::str::contains("Fix:"));
}

// ============================================================================
// schema
// ============================================================================

#[test]
fn test_schema_prints_closed_object() {
    let temp_dir = TempDir::new().unwrap();
    let properties = write_file(
        &temp_dir,
        "props.yaml",
        r#"
stdout: {type: string}
return_code: {type: integer}
"#,
    );

    outgate_cmd()
        .args(["schema", &properties])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"additionalProperties\": false"))
        .stdout(predicate::str::contains("\"type\": \"object\""))
        .stdout(predicate::str::contains("\"return_code\""));
}

#[test]
fn test_schema_rejects_non_mapping() {
    let temp_dir = TempDir::new().unwrap();
    let properties = write_file(&temp_dir, "props.yaml", "- a\n- b\n");

    outgate_cmd()
        .args(["schema", &properties])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a mapping"));
}
