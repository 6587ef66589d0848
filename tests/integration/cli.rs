// CLI Tests
//
// Runs the elmdef binary against projects written to temp directories.

mod common;
use common::*;

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn project() -> tempfile::TempDir {
    write_project(&[
        ("elm.json", r#"{"type": "application", "source-directories": ["src"]}"#),
        ("src/Main.elm", "module Main exposing (main)\n\nimport Route exposing (Route)\n\n\ntype Msg\n    = Navigate Route\n"),
        ("src/Route.elm", "module Route exposing (Route(..))\n\n\ntype Route\n    = Home\n    | Profile String\n"),
    ])
}

// ============================================================
// parse
// ============================================================

#[test]
fn parse_prints_statements() {
    let dir = project();
    let output = elmdef().arg("parse").arg(dir.path().join("src/Route.elm")).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(
        stdout_of(&output),
        "1:1  module Route exposing (Route(..))\n4:1  type Route = Home | Profile String\n"
    );
}

#[test]
fn parse_json() {
    let dir = project();
    let output = elmdef().args(["parse", "--json"]).arg(dir.path().join("src/Route.elm")).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(json["status"], "parsed");
    assert_eq!(json["statements"][0]["statement"], "module");
    assert_eq!(json["statements"][0]["name"], "Route");
    assert_eq!(json["statements"][1]["statement"], "type");
    assert_eq!(json["statements"][1]["position"]["line"], 3);
    assert_eq!(json["statements"][1]["constructors"][1]["name"], "Profile");
}

#[test]
fn parse_missing_file() {
    let output = elmdef().args(["parse", "does/not/exist.elm"]).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("could not read"));
}

// ============================================================
// check
// ============================================================

#[test]
fn check_clean_file() {
    let dir = project();
    let output = elmdef().arg("check").arg(dir.path().join("src/Main.elm")).output().unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).ends_with(": ok\n"));
}

#[test]
fn check_reports_skipped_declarations() {
    let dir = write_project(&[("Bad.elm", "module Bad\n\ntype alias Broken = { a : }\n\ntype Fine = Fine\n")]);
    let output = elmdef().arg("check").arg(dir.path().join("Bad.elm")).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("expected type, found }"), "stderr: {stderr}");
    assert!(stderr.contains("1 declaration(s) skipped"));
}

// ============================================================
// index
// ============================================================

#[test]
fn index_lists_files() {
    let dir = project();
    let output = elmdef().arg("index").arg(dir.path()).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Main.elm (module Main)"));
    assert!(stdout.contains("    imports "));
    assert!(stdout.contains("    type Route at 4:1"));
    assert!(stdout.contains("    type Msg at 6:1"));
}

#[test]
fn index_json() {
    let dir = project();
    let output = elmdef().args(["index", "--json"]).arg(dir.path()).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(json["nodes"].as_object().unwrap().len(), 2);
}

#[test]
fn index_reports_module_collisions() {
    let dir = write_project(&[("a/Util.elm", "module Util\n"), ("b/Util.elm", "module Util\n")]);
    let output = elmdef().arg("index").arg(dir.path()).output().unwrap();
    assert!(output.status.success());
    assert!(stderr_of(&output).contains("module Util is declared by more than one file"));
}

#[test]
fn index_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let output = elmdef().arg("index").arg(dir.path().join("gone")).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("is not a directory"));
}

// ============================================================
// definition
// ============================================================

#[test]
fn definition_by_symbol() {
    let dir = project();
    let output = elmdef()
        .arg("definition")
        .arg(dir.path().join("src/Main.elm"))
        .arg("Route")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.trim_end().ends_with("Route.elm:4:1"), "stdout: {stdout}");
}

#[test]
fn definition_by_caret() {
    let dir = project();
    // "    = Navigate Route": Route starts at column 16 (one-based)
    let output = elmdef()
        .arg("definition")
        .arg(dir.path().join("src/Main.elm"))
        .args(["--line", "7", "--column", "18"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).trim_end().ends_with("Route.elm:4:1"));
}

#[test]
fn definition_own_file() {
    let dir = project();
    let output = elmdef()
        .arg("definition")
        .arg(dir.path().join("src/Main.elm"))
        .arg("Msg")
        .arg("--root")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).trim_end().ends_with("Main.elm:6:1"));
}

#[test]
fn definition_not_found() {
    let dir = project();
    let output = elmdef()
        .arg("definition")
        .arg(dir.path().join("src/Main.elm"))
        .arg("Nowhere")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("no definition found"));
}

#[test]
fn definition_requires_symbol_or_caret() {
    let dir = project();
    let output = elmdef().arg("definition").arg(dir.path().join("src/Main.elm")).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn verbose_logs_to_stderr() {
    let dir = project();
    let output = elmdef()
        .args(["-v", "definition"])
        .arg(dir.path().join("src/Main.elm"))
        .arg("Route")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stderr_of(&output).contains("found source files"));
}
