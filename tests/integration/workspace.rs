// Workspace Loading Tests
//
// Projects on disk: elm.json source directories, vendor directories,
// unreadable files, and end-to-end lookups through the loader.

mod common;
use common::*;

use elmdef::workspace::{find_source_files, load_project};
use elmdef::{find_definition, index_project, Query};

const ELM_JSON: &str = r#"{
    "type": "application",
    "source-directories": [
        "src",
        "../shared"
    ],
    "elm-version": "0.19.1",
    "dependencies": { "direct": {}, "indirect": {} },
    "test-dependencies": { "direct": {}, "indirect": {} }
}"#;

// ============================================================
// Enumeration
// ============================================================

#[test]
fn source_directories_are_honored() {
    let dir = write_project(&[
        ("app/elm.json", ELM_JSON),
        ("app/src/Main.elm", "module Main\nimport Shared\n"),
        ("app/tests/MainTest.elm", "module MainTest\n"),
        ("shared/Shared.elm", "module Shared\ntype alias Id = Int\n"),
    ]);
    let root = dir.path().join("app");
    let files = find_source_files(&root).unwrap();
    let mut names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
    names.sort();
    assert_eq!(names, vec!["Main.elm", "Shared.elm"]);
}

#[test]
fn no_manifest_walks_everything() {
    let dir = write_project(&[
        ("src/Main.elm", "module Main\n"),
        ("lib/deep/nested/Util.elm", "module Util\n"),
        ("elm-stuff/generated/Gen.elm", "module Gen\n"),
        ("README.md", "type A = A"),
    ]);
    let files = find_source_files(dir.path()).unwrap();
    assert_eq!(files, vec![dir.path().join("lib/deep/nested/Util.elm"), dir.path().join("src/Main.elm")]);
}

#[test]
fn package_manifest_defaults_to_src() {
    let dir = write_project(&[
        ("elm.json", r#"{"type": "package", "name": "author/pkg"}"#),
        ("src/Pkg.elm", "module Pkg\n"),
        ("benchmarks/Bench.elm", "module Bench\n"),
    ]);
    let files = find_source_files(dir.path()).unwrap();
    assert_eq!(files, vec![dir.path().join("src/Pkg.elm")]);
}

#[test]
fn malformed_manifest_falls_back_to_root() {
    let dir = write_project(&[("elm.json", "{ \"source-directories\": "), ("other/A.elm", "module A\n")]);
    let files = find_source_files(dir.path()).unwrap();
    assert_eq!(files, vec![dir.path().join("other/A.elm")]);
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_project(&dir.path().join("missing")).unwrap_err();
    assert!(err.to_string().contains("is not a directory"));
}

// ============================================================
// Reading
// ============================================================

#[test]
fn unreadable_file_is_excluded() {
    let dir = write_project(&[("Good.elm", "module Good\ntype T = T\n")]);
    std::fs::write(dir.path().join("Bad.elm"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    let files = load_project(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].path.ends_with("Good.elm"));
    assert_eq!(files[0].text, "module Good\ntype T = T\n");
}

#[test]
fn index_project_builds_graph() {
    let dir = write_project(&[
        ("Main.elm", "module Main\nimport Types\n"),
        ("Types.elm", "module Types\ntype alias User = { name : String }\n"),
    ]);
    let index = index_project(dir.path()).unwrap();
    assert_eq!(index.graph().len(), 2);
    let main = dir.path().join("Main.elm");
    assert_eq!(index.graph().dependencies_of(&main), &[dir.path().join("Types.elm")]);
}

// ============================================================
// End to end
// ============================================================

#[test]
fn find_definition_by_symbol_and_caret() {
    let dir = write_project(&[
        ("elm.json", r#"{"type": "application", "source-directories": ["src"]}"#),
        ("src/Main.elm", "module Main exposing (..)\n\nimport Types exposing (User)\n\n\nview : User -> String\nview user =\n    user.name\n"),
        ("src/Types.elm", "module Types exposing (..)\n\n\ntype alias User =\n    { name : String }\n"),
    ]);
    let root = dir.path().canonicalize().unwrap();
    let main = dir.path().join("src/Main.elm");

    let def = find_definition(dir.path(), &main, Query::Symbol("User")).unwrap().unwrap();
    assert_eq!(def.path, root.join("src/Types.elm"));
    assert_eq!(def.position.line, 3);

    // Caret on "User" in "view : User -> String"
    let by_caret = find_definition(dir.path(), &main, Query::Caret { line: 5, column: 8 }).unwrap();
    assert_eq!(by_caret, Some(def));

    assert_eq!(find_definition(dir.path(), &main, Query::Symbol("Missing")).unwrap(), None);
}

#[test]
fn find_definition_missing_file_is_error() {
    let dir = write_project(&[("Main.elm", "module Main\n")]);
    assert!(find_definition(dir.path(), &dir.path().join("Nope.elm"), Query::Symbol("X")).is_err());
}
