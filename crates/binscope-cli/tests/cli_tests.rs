//! Integration tests for binscope-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use binscope_core::test_utils::TarTestBuilder;
use binscope_core::test_utils::ZipTestBuilder;
use binscope_core::test_utils::elf_header;
use binscope_core::test_utils::gzip;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn binscope_cmd() -> Command {
    cargo_bin_cmd!("binscope")
}

fn write_fixture(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("failed to write fixture");
    path
}

fn sample_tgz(dir: &TempDir) -> PathBuf {
    let tar = TarTestBuilder::new()
        .add_directory("site/")
        .add_file("site/index.html", b"<html></html>")
        .add_file("site/app.js", &[b'x'; 2048])
        .build();
    write_fixture(dir, "site.tar.gz", &gzip(&tar))
}

#[test]
fn test_version_flag() {
    binscope_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("binscope"));
}

#[test]
fn test_help_flag() {
    binscope_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command-line utility"));
}

#[test]
fn test_inspect_help() {
    binscope_cmd()
        .args(["inspect", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--profile"))
        .stdout(predicate::str::contains("--no-tools"));
}

#[test]
fn test_inspect_tar_gz() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_tgz(&temp);

    binscope_cmd()
        .arg("inspect")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive file: site.tar.gz"))
        .stdout(predicate::str::contains("Format: tar.gz"))
        .stdout(predicate::str::contains("Files: 2, Directories: 1"))
        .stdout(predicate::str::contains("site/app.js (2.0 KB)"));
}

#[test]
fn test_inspect_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_tgz(&temp);

    let output = binscope_cmd()
        .args(["--json", "inspect"])
        .arg(&archive)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "inspect");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["explorer"], "archive");
    assert!(
        json["data"]["summary"]
            .as_str()
            .unwrap()
            .contains("Format: tar.gz")
    );
    assert!(json["data"]["token_estimate"].as_u64().unwrap() > 0);
}

#[test]
fn test_inspect_enhancement_profile() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let zip = ZipTestBuilder::new()
        .file("src/main.rs", b"fn main() {}")
        .build();
    let path = write_fixture(&temp, "crate.zip", &zip);

    binscope_cmd()
        .args(["inspect", "--profile", "enhancement"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Compression methods:"));

    binscope_cmd()
        .arg("inspect")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Compression methods:").not());
}

#[test]
fn test_inspect_executable_without_tools() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let path = write_fixture(&temp, "daemon", &elf_header());

    binscope_cmd()
        .args(["inspect", "--no-tools"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Executable file: daemon"))
        .stdout(predicate::str::contains("Format: ELF"))
        .stdout(predicate::str::contains("Dependencies:").not());
}

#[test]
fn test_inspect_unsupported_file_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let path = write_fixture(&temp, "notes.txt", b"just some text");

    binscope_cmd()
        .arg("inspect")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not recognized"))
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_inspect_missing_file_fails() {
    binscope_cmd()
        .args(["inspect", "/nonexistent/archive.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read"));
}

#[test]
fn test_inspect_invalid_timeout() {
    binscope_cmd()
        .args(["inspect", "--timeout", "soon", "a.zip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid timeout"));
}

#[test]
fn test_identify() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_tgz(&temp);
    let text = write_fixture(&temp, "readme.md", b"# hello");

    binscope_cmd()
        .arg("identify")
        .arg(&archive)
        .arg(&text)
        .assert()
        .success()
        .stdout(predicate::str::contains("archive: tar.gz"))
        .stdout(predicate::str::contains("unsupported"));
}

#[test]
fn test_identify_json() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let path = write_fixture(&temp, "daemon", &elf_header());

    let output = binscope_cmd()
        .args(["--json", "identify"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "identify");
    assert_eq!(json["data"]["supported"], true);
    assert_eq!(json["data"]["explorer"], "executable");
}

#[test]
fn test_completion_bash() {
    binscope_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("binscope"));
}

#[test]
fn test_inspect_skips_directories() {
    let temp = TempDir::new().expect("failed to create temp dir");

    binscope_cmd()
        .arg("inspect")
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping directory"));
}

#[test]
fn test_identify_continues_past_unreadable_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_tgz(&temp);

    binscope_cmd()
        .arg("identify")
        .arg(temp.path().join("missing.zip"))
        .arg(&archive)
        .assert()
        .failure()
        .stdout(predicate::str::contains("archive: tar.gz"))
        .stderr(predicate::str::contains("Could not open"))
        .stderr(predicate::str::contains("1 of 2 file(s) could not be identified"));
}
