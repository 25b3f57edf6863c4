//! Integration tests for the `elm-infer` binary

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const VALID: &str = r#"{
  "name": "Main",
  "declarations": [
    {"name": "identity", "args": [{"kind": {"Var": "x"}}], "body": {"kind": {"Var": "x"}}},
    {"name": "greeting", "body": {"kind": {"String": "hello"}}}
  ]
}"#;

const UNBOUND: &str = r#"{
  "name": "Main",
  "declarations": [
    {"name": "broken", "body": {"kind": {"Var": "missing"}, "meta": {"start": {"line": 3, "column": 10}, "end": {"line": 3, "column": 17}}}}
  ]
}"#;

const NESTED: &str = r#"{
  "name": "Main",
  "declarations": [
    {"name": "one", "body": {"kind": {"Parenthesized": {"kind": {"Parenthesized": {"kind": {"Parenthesized": {"kind": {"Integer": 1}}}}}}}}}
  ]
}"#;

/// Helper function to create a test file
fn create_test_file(
    dir: &TempDir,
    name: &str,
    content: &str,
) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(
    dir: &TempDir,
    args: &[&str],
) -> Output {
    Command::new(env!("CARGO_BIN_EXE_elm-infer"))
        .current_dir(dir.path())
        .env_remove("ELM_INFER_LOG")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_check_valid_file() {
    let dir = TempDir::new().unwrap();
    let file = create_test_file(&dir, "main.json", VALID);

    let output = run(&dir, &["check", file.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "identity : a -> a\ngreeting : String\n");
}

#[test]
fn test_check_reports_unbound_variable() {
    let dir = TempDir::new().unwrap();
    let file = create_test_file(&dir, "main.json", UNBOUND);

    let output = run(&dir, &["check", "--no-color", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E1001"), "{}", stderr);
    assert!(stderr.contains("unbound variable `missing`"), "{}", stderr);
}

#[test]
fn test_check_json_diagnostics() {
    let dir = TempDir::new().unwrap();
    let file = create_test_file(&dir, "main.json", UNBOUND);

    let output = run(&dir, &["check", "--diagnostics", "json", file.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let value: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap();
    assert_eq!(value["code"], "E1001");
    assert_eq!(value["range"]["start"]["line"], 2);
}

#[test]
fn test_check_malformed_json() {
    let dir = TempDir::new().unwrap();
    let file = create_test_file(&dir, "main.json", "{ not json");

    let output = run(&dir, &["check", file.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse"), "{}", stderr);
}

#[test]
fn test_types_qualified_names() {
    let dir = TempDir::new().unwrap();
    let file = create_test_file(&dir, "main.json", VALID);

    let output = run(&dir, &["types", file.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Main.identity : a -> a"));
    assert!(stdout.contains("Main.greeting : String"));
}

#[test]
fn test_types_json_dump() {
    let dir = TempDir::new().unwrap();
    let file = create_test_file(&dir, "main.json", VALID);

    let output = run(&dir, &["types", "--json", file.to_str().unwrap()]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["Main"]["declarations"][0]["name"], "identity");
    assert!(value["Main"]["declarations"][0]["meta"]["ty"].is_object());
}

#[test]
fn test_config_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    create_test_file(&dir, "elm-infer.toml", "[infer]\nmax_depth = 2\n");
    let file = create_test_file(&dir, "main.json", NESTED);

    let output = run(&dir, &["config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("max_depth = 2"), "{}", stdout);

    let output = run(&dir, &["check", "--no-color", file.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E1005"), "{}", stderr);
}
