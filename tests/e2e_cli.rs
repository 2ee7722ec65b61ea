//! CLI end-to-end tests
//!
//! Tests for the variantforge command-line interface. None of these need
//! GraphicsMagick or ImageMagick to be installed.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the variantforge binary
#[allow(deprecated)]
fn variantforge_cmd() -> Command {
    Command::cargo_bin("variantforge").unwrap()
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("variantforge.toml");
    let tmp = dir.join("tmp");
    fs::write(
        &path,
        format!(
            r#"
[processor]
tmp_dir = "{}"

[processor.transforms.thumbnail]
resize = "150x150"
format = "png"

[processor.transforms.large]
resize = "1600x1600>"
"#,
            tmp.display()
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = variantforge_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = variantforge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("variantforge"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = variantforge_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("variantforge"));
}

#[test]
fn test_cli_process_help() {
    let mut cmd = variantforge_cmd();
    cmd.args(["process", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configured variant"));
}

#[test]
fn test_cli_schema_lists_transforms() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = variantforge_cmd();
    cmd.arg("--config")
        .arg(&config)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"thumbnail\""))
        .stdout(predicate::str::contains("\"large\""))
        .stdout(predicate::str::contains("\"integer\""));
}

#[test]
fn test_cli_validate_valid_config() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = variantforge_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("thumbnail"));
}

#[test]
fn test_cli_validate_rejects_missing_transforms() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("empty.toml");
    fs::write(&config, "[storage]\nroot = \"/tmp\"\n").unwrap();

    let mut cmd = variantforge_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("transforms is required"));
}

#[test]
fn test_cli_process_missing_input() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = variantforge_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["process", "/nonexistent/photo.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_remove_missing_records() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let mut cmd = variantforge_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["remove", "/nonexistent/records.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("records file"));
}
