//! CLI integration tests for fix-db-utf8.
//!
//! These tests verify command-line argument parsing, help output,
//! the encoding listing, and exit codes. No database is required.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the fix-db-utf8 binary.
fn cmd() -> Command {
    Command::cargo_bin("fix-db-utf8").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_exits_with_code_1() {
    // Usage output is not a successful run.
    cmd().arg("-h").assert().code(1);
    cmd().arg("--help").assert().code(1);
}

#[test]
fn test_help_shows_all_flags() {
    cmd()
        .arg("--help")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--user"))
        .stdout(predicate::str::contains("--password"))
        .stdout(predicate::str::contains("--database"))
        .stdout(predicate::str::contains("--source-encoding"))
        .stdout(predicate::str::contains("--list-encodings"));
}

#[test]
fn test_long_help_explains_variants() {
    cmd()
        .arg("--help")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("-e latin1"))
        .stdout(predicate::str::contains("backup"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fix-db-utf8"));
}

// =============================================================================
// Encoding Listing Tests
// =============================================================================

#[test]
fn test_list_encodings_exits_with_code_1() {
    cmd()
        .arg("-l")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Encodings:"))
        .stdout(predicate::str::contains("latin1\tcp1252 West European"))
        .stdout(predicate::str::contains("utf8mb4\tUTF-8 Unicode"))
        .stdout(predicate::str::contains("binary\tBinary pseudo charset"));
}

#[test]
fn test_list_encodings_works_without_credentials() {
    // -l must not require -u/-p/-d.
    cmd()
        .arg("--list-encodings")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("gb18030"));
}

// =============================================================================
// Missing Required Input Tests (Exit Code 1)
// =============================================================================

#[test]
fn test_no_arguments_exits_with_code_1() {
    cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Please provide"));
}

#[test]
fn test_missing_database_exits_with_code_1() {
    cmd()
        .args(["-u", "root", "-p", "secret"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Please provide"));
}

#[test]
fn test_missing_password_exits_with_code_1() {
    cmd()
        .args(["-u", "root", "-d", "typo3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Please provide"));
}

// =============================================================================
// Default Flag Values
// =============================================================================

#[test]
fn test_host_and_port_defaults() {
    cmd()
        .arg("--help")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[default: localhost]"))
        .stdout(predicate::str::contains("[default: 3306]"));
}

#[test]
fn test_log_flags_exist() {
    cmd()
        .arg("--help")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("--output-json"));
}
