use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn access_audit() -> Command {
    let mut cmd = Command::cargo_bin("access-audit").unwrap();
    for var in [
        "ACCESS_AUDIT_WTMP",
        "ACCESS_AUDIT_SNAPSHOT_LOG",
        "ACCESS_AUDIT_KEYS_FILE",
        "ACCESS_AUDIT_PASSWD_FILE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_no_mode_prints_usage() {
    access_audit()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_help_lists_modes() {
    access_audit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--did"))
        .stdout(predicate::str::contains("--could"))
        .stdout(predicate::str::contains("--log"));
}

#[test]
fn test_non_positive_days_rejected() {
    for days in ["0", "-3", "soon"] {
        access_audit()
            .args(["--did", days])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid days value"));
    }
}

#[test]
fn test_modes_are_exclusive() {
    access_audit()
        .args(["--did", "3", "--log"])
        .assert()
        .failure();
}

#[test]
fn test_csv_conflicts_with_json() {
    access_audit()
        .args(["--did", "3", "--csv", "--json"])
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    access_audit()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("access-audit"));
}

#[test]
fn test_did_with_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let prefix = dir.path().join("gone").join("wtmp");

    access_audit()
        .args(["--did", "2", "--path"])
        .arg(&prefix)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_did_default_days() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("passwd"), "").unwrap();

    access_audit()
        .arg("--did")
        .arg("--path")
        .arg(dir.path().join("wtmp"))
        .arg("--passwd-file")
        .arg(dir.path().join("passwd"))
        .assert()
        .success()
        .stdout(predicate::str::contains("in the last 31 days"));
}

#[test]
fn test_log_then_could() {
    let dir = TempDir::new().unwrap();
    let passwd = dir.path().join("passwd");
    let keys = dir.path().join("keys");
    let log = dir.path().join("could.log");
    fs::write(&passwd, "alice:x:1000:1000:Alice Smith:/home/alice:/bin/bash\n").unwrap();
    fs::write(&keys, "alice:ssh-ed25519 AAAAC3Nza alice@desk\n").unwrap();

    access_audit()
        .arg("--log")
        .arg("--path")
        .arg(&log)
        .arg("--keys-file")
        .arg(&keys)
        .arg("--passwd-file")
        .arg(&passwd)
        .assert()
        .success();
    assert!(log.exists());

    access_audit()
        .args(["--could", "1", "--path"])
        .arg(&log)
        .arg("--passwd-file")
        .arg(&passwd)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 user had access to"))
        .stdout(predicate::str::contains("Alice Smith"));
}

#[test]
fn test_environment_configures_paths() {
    let dir = TempDir::new().unwrap();
    let passwd = dir.path().join("passwd");
    let keys = dir.path().join("keys");
    let log = dir.path().join("could.log");
    fs::write(&passwd, "bob:x:1001:1001:Bob Jones:/home/bob:/bin/bash\n").unwrap();
    fs::write(&keys, "bob:ssh-rsa AAAAB3Nza bob@laptop\n").unwrap();

    access_audit()
        .arg("--log")
        .env("ACCESS_AUDIT_SNAPSHOT_LOG", &log)
        .env("ACCESS_AUDIT_KEYS_FILE", &keys)
        .env("ACCESS_AUDIT_PASSWD_FILE", &passwd)
        .assert()
        .success();

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.trim_end().ends_with(",bob"));
}
