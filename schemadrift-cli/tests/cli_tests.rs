//! Integration tests for the schemadrift CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the schemadrift binary with a scrubbed environment
fn schemadrift_cmd() -> Command {
    let mut cmd = Command::cargo_bin("schemadrift").unwrap();
    cmd.env_remove("DEV_DATABASE_URL")
        .env_remove("TEST_DATABASE_URL")
        .env_remove("DATABASE_URL");
    cmd
}

#[test]
fn test_help_command() {
    schemadrift_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema drift"))
        .stdout(predicate::str::contains("diff"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_version_command() {
    schemadrift_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Version"))
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_version_flag() {
    schemadrift_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_diff_help() {
    schemadrift_cmd()
        .args(["diff", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--migrations-dir"))
        .stdout(predicate::str::contains("--snake-case"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_bare_invocation_rejects_unknown_environment() {
    schemadrift_cmd()
        .args(["staging", "test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown environment"));
}

#[test]
fn test_diff_without_database_url_fails_with_config_error() {
    schemadrift_cmd()
        .args(["development", "test"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DEV_DATABASE_URL"));
}

#[test]
fn test_diff_with_invalid_url_fails() {
    schemadrift_cmd()
        .env("DEV_DATABASE_URL", "not-a-url")
        .env("TEST_DATABASE_URL", "postgresql://localhost/crm_test")
        .args(["development", "test"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid database URL").or(
            predicate::str::contains("Configuration error"),
        ));
}

#[test]
fn test_diff_missing_target_url_fails_before_any_capture() {
    // The target URL must resolve before the source capture runs, so a
    // reachable source URL never gets dialed when the target is unset.
    schemadrift_cmd()
        .env("DEV_DATABASE_URL", "postgresql://localhost:5432/crm_dev")
        .args(["development", "test"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Capturing").not())
        .stderr(predicate::str::contains("TEST_DATABASE_URL"))
        .stderr(predicate::str::contains("Connection error").not());
}

#[test]
fn test_diff_same_environment_rejected() {
    schemadrift_cmd()
        .env("DEV_DATABASE_URL", "postgresql://localhost/crm_dev")
        .args(["development", "development"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must differ"));
}

#[test]
fn test_diff_missing_target_argument() {
    schemadrift_cmd()
        .arg("development")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_apply_rejects_malformed_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("20240101_whatever.sql");
    fs::write(&path, "SELECT 1;").unwrap();

    schemadrift_cmd()
        .args(["apply", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid migration file name"));
}

#[test]
fn test_apply_without_database_url_fails_after_parsing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir
        .path()
        .join("schema-fix-development-to-test-2024-01-15T10-30-00.000Z.sql");
    fs::write(&path, "BEGIN;\nSELECT 1;\nCOMMIT;\n").unwrap();

    // File name parses to target=test, so the failure is the missing URL
    schemadrift_cmd()
        .args(["apply", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TEST_DATABASE_URL"));
}

#[test]
fn test_status_without_database_url_fails() {
    schemadrift_cmd()
        .args(["status", "production"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn test_invalid_command() {
    schemadrift_cmd()
        .arg("--definitely-not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
