//! End-to-end tests for fiddle CLI commands.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

const CATALOG: &str = r#"[
    {
        "name": "Lib",
        "organization": "org.example",
        "artifact": "lib",
        "version": "1.0",
        "cross": "scala",
        "versions": ["2.12"],
        "extraDeps": ["org.example:%%lib-core:1.0"]
    }
]"#;

const STORE: &str = r#"{
    "fiddles": [
        {
            "id": "demo",
            "version": 3,
            "owner": "anonymous",
            "name": "Demo  Fiddle",
            "sourceCode": "println(\"demo\")",
            "libraries": ["org.example:%%lib:1.0", "gone:gone:0.1"],
            "scalaVersion": "2.12"
        }
    ]
}"#;

/// Temporary directory holding a catalog and a store file.
struct Fixture {
    temp_dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("libraries.json"), CATALOG).expect("Failed to write catalog");
        fs::write(temp_dir.path().join("store.json"), STORE).expect("Failed to write store");
        Self { temp_dir }
    }

    fn catalog(&self) -> PathBuf {
        self.temp_dir.path().join("libraries.json")
    }

    fn store(&self) -> PathBuf {
        self.temp_dir.path().join("store.json")
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write file");
        path
    }
}

fn fiddle() -> Command {
    Command::cargo_bin("fiddle").expect("Failed to find fiddle binary")
}

// =============================================================================
// Token Commands
// =============================================================================

#[test]
fn test_encode_decode_roundtrip() {
    let source = "val x = 1\n// $FiddleDependency org.example:%%lib:1.0";

    let output = fiddle()
        .arg("encode")
        .write_stdin(source)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let token = String::from_utf8(output).unwrap().trim().to_string();

    assert!(!token.contains('='));
    fiddle()
        .args(["decode", &token])
        .assert()
        .success()
        .stdout(source.to_string());
}

#[test]
fn test_encode_file() {
    let fixture = Fixture::new();
    let path = fixture.write("hello.scala", "println(1)");

    fiddle()
        .arg("encode")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[A-Za-z0-9_-]+\n$").unwrap());
}

#[test]
fn test_decode_invalid_token_fails() {
    fiddle()
        .args(["decode", "!!!not-a-token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid source token"));
}

// =============================================================================
// Parse Command
// =============================================================================

#[test]
fn test_parse_reports_code_and_libraries() {
    let fixture = Fixture::new();
    let path = fixture.write(
        "fiddle.scala",
        "val x = 1\n// $FiddleDependency org.example:%%lib:1.0\n// $FiddleDependency gone:gone:0.1\n// $FiddleName My Fiddle  \n",
    );

    let output = fiddle()
        .arg("parse")
        .arg(&path)
        .arg("--catalog")
        .arg(fixture.catalog())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["code"], "val x = 1");
    assert_eq!(json["name"], "My Fiddle  ");
    assert_eq!(json["libraries"], serde_json::json!(["org.example:%%lib:1.0"]));
    assert_eq!(json["unresolved"], serde_json::json!(["gone:gone:0.1"]));
}

// =============================================================================
// Export Command
// =============================================================================

#[test]
fn test_export_saved_fiddle() {
    let fixture = Fixture::new();

    fiddle()
        .args(["export", "demo", "3"])
        .arg("--catalog")
        .arg(fixture.catalog())
        .arg("--store")
        .arg(fixture.store())
        .assert()
        .success()
        .stdout(
            "println(\"demo\")\n\n\
             // $FiddleDependency org.example:%%lib:1.0\n\
             // $FiddleDependency org.example:%%lib-core:1.0\n\
             // $FiddleName Demo Fiddle\n",
        );
}

#[test]
fn test_export_missing_fiddle_fails() {
    let fixture = Fixture::new();

    fiddle()
        .args(["export", "demo", "4"])
        .arg("--catalog")
        .arg(fixture.catalog())
        .arg("--store")
        .arg(fixture.store())
        .assert()
        .failure()
        .stderr(predicate::str::contains("fiddle not found"));
}

// =============================================================================
// Serve Command
// =============================================================================

#[test]
fn test_serve_rejects_zero_refresh_interval() {
    fiddle()
        .args(["serve", "--catalog-refresh-secs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--catalog-refresh-secs"));
}
