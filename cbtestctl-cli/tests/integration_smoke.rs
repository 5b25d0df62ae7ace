//! Smoke tests to verify the CLI surface wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_documents_the_version_option() {
    let mut cmd = Command::cargo_bin("cbtestctl").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Couchbase Server versions"))
        .stdout(predicate::str::contains("--work-dir"));
}

#[test]
fn test_cluster_versions_option_is_required() {
    let mut cmd = Command::cargo_bin("cbtestctl").unwrap();

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--cluster-versions"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("cbtestctl").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cbtestctl"));
}

#[test]
fn test_missing_cbdyncluster_override_fails_preflight() {
    let mut cmd = Command::cargo_bin("cbtestctl").unwrap();
    cmd.args([
        "-c",
        "7.2.0",
        "--cbdyncluster",
        "/nonexistent/cbdyncluster",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cbdyncluster override not found"));
}
