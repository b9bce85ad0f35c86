use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("oidc-migrate").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Migrate GitHub workflow files from static AWS credentials to OIDC",
        ));
}

#[test]
fn test_scan_help() {
    let mut cmd = Command::cargo_bin("oidc-migrate").unwrap();
    cmd.args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--org"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_update_help() {
    let mut cmd = Command::cargo_bin("oidc-migrate").unwrap();
    cmd.args(["update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--repo"))
        .stdout(predicate::str::contains("--base-branch"));
}

#[test]
fn test_missing_token_is_fatal() {
    let mut cmd = Command::cargo_bin("oidc-migrate").unwrap();
    cmd.env_remove("GITHUB_TOKEN")
        .args(["scan", "--org", "codespark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_scan_requires_org() {
    let mut cmd = Command::cargo_bin("oidc-migrate").unwrap();
    cmd.env("GITHUB_TOKEN", "ghp_test_token")
        .arg("scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--org"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("oidc-migrate").unwrap();
    cmd.arg("invalid-command").assert().failure();
}
