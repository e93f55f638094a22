use assert_cmd::Command;
use password2h::{HashSalt, Hasher};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FAST: [&str; 6] = ["--time", "1", "--memory", "64", "--threads", "1"];

/// A home directory with no saved hasher parameters.
fn empty_home() -> PathBuf {
    Path::new(env!("CARGO_TARGET_TMPDIR")).join("password2h-empty-home")
}

fn bin() -> Command {
    bin_with_home(&empty_home())
}

fn bin_with_home(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("password2h"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("P2H_CONFIG")
        .env_remove("P2H_PASSWORD")
        .env_remove("P2H_TIME")
        .env_remove("P2H_MEMORY")
        .env_remove("P2H_THREADS")
        .env_remove("P2H_KEY_LEN")
        .env_remove("P2H_SALT_LEN")
        .env_remove("P2H_MAX_TIME")
        .env_remove("P2H_MAX_MEMORY")
        .env_remove("P2H_MAX_THREADS");
    cmd
}

fn hash(password: &str, extra: &[&str]) -> String {
    let output = bin()
        .env("P2H_PASSWORD", password)
        .args(FAST)
        .arg("hash")
        .args(extra)
        .output()
        .unwrap();

    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
fn hash_and_verify_roundtrip() {
    let encoded = hash("pw", &[]);
    assert!(!encoded.is_empty());

    bin()
        .env("P2H_PASSWORD", "pw")
        .args(FAST)
        .arg("verify")
        .arg(&encoded)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("valid"));
}

#[test]
fn wrong_password_fails() {
    let encoded = hash("pw", &[]);

    bin()
        .env("P2H_PASSWORD", "wrong_pw")
        .args(FAST)
        .arg("verify")
        .arg(&encoded)
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid"));
}

#[test]
fn malformed_hash_is_reported_invalid() {
    bin()
        .env("P2H_PASSWORD", "pw")
        .args(FAST)
        .arg("verify")
        .arg("0OIl")
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid"));
}

#[test]
fn password_can_be_piped() {
    let output = bin()
        .args(FAST)
        .arg("hash")
        .write_stdin("piped secret\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let encoded = String::from_utf8(output.stdout).unwrap().trim().to_string();

    bin()
        .args(FAST)
        .arg("verify")
        .arg(&encoded)
        .write_stdin("piped secret\n")
        .assert()
        .success();
}

#[test]
fn empty_piped_password_fails() {
    bin()
        .args(FAST)
        .arg("hash")
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No password provided"));
}

#[test]
fn different_parameters_do_not_verify() {
    let encoded = hash("pw", &[]);

    bin()
        .env("P2H_PASSWORD", "pw")
        .args(["--time", "2", "--memory", "64", "--threads", "1"])
        .arg("verify")
        .arg(&encoded)
        .assert()
        .failure();
}

#[test]
fn sealed_hash_verifies_without_flags() {
    let encoded = hash("pw", &["--sealed"]);

    bin()
        .env("P2H_PASSWORD", "pw")
        .arg("verify")
        .arg("--sealed")
        .arg(&encoded)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("valid"));
}

#[test]
fn sealed_hash_with_huge_costs_is_invalid() {
    let greedy = Hasher::new(1, 8, u32::MAX, 1, 4);
    let sealed = greedy.seal_password(&HashSalt::new(vec![1u8; 4], vec![2u8; 8]));

    bin()
        .env("P2H_PASSWORD", "pw")
        .arg("verify")
        .arg("--sealed")
        .arg(&sealed)
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid"));

    bin()
        .arg("inspect")
        .arg("--sealed")
        .arg(&sealed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("costs exceed limits"));
}

#[test]
fn sealed_cost_limits_can_be_tightened() {
    let encoded = hash("pw", &["--sealed"]);

    bin()
        .env("P2H_PASSWORD", "pw")
        .args(["--max-memory", "32"])
        .arg("verify")
        .arg("--sealed")
        .arg(&encoded)
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid"));
}

#[test]
fn inspect_reports_lengths() {
    let encoded = hash("pw", &["--key-len", "32", "--salt-len", "16"]);

    let output = bin()
        .args(FAST)
        .args(["--key-len", "32", "--salt-len", "16"])
        .arg("inspect")
        .arg(&encoded)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["format"], "bare");
    assert_eq!(report["key_len"], 32);
    assert_eq!(report["salt_len"], 16);
}

#[test]
fn inspect_sealed_reports_params() {
    let encoded = hash("pw", &["--sealed"]);

    let output = bin()
        .arg("inspect")
        .arg("--sealed")
        .arg(&encoded)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["format"], "sealed");
    assert_eq!(report["params"]["memory"], 64);
    assert_eq!(report["params"]["threads"], 1);
    assert_eq!(report["key_len"], 40);
}

#[test]
fn inspect_rejects_truncated_hash() {
    bin()
        .args(FAST)
        .arg("inspect")
        .arg("2NEpo7TZRRrLZSi2U")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid password hash"));
}

#[test]
fn params_can_be_saved_and_reused() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("hasher.json");

    bin()
        .args(["--time", "2", "--memory", "128", "--threads", "2"])
        .arg("params")
        .arg("--save")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("saved hasher parameters"));

    assert!(config.exists());

    bin()
        .arg("--config")
        .arg(&config)
        .arg("params")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"time\": 2"))
        .stdout(predicate::str::contains("\"memory\": 128"));

    let encoded = bin()
        .env("P2H_PASSWORD", "pw")
        .arg("--config")
        .arg(&config)
        .arg("hash")
        .output()
        .unwrap();
    let encoded = String::from_utf8(encoded.stdout).unwrap().trim().to_string();

    bin()
        .env("P2H_PASSWORD", "pw")
        .env("P2H_CONFIG", &config)
        .arg("verify")
        .arg(&encoded)
        .assert()
        .success();
}

#[cfg(target_os = "linux")]
#[test]
fn platform_config_is_read_from_home() {
    let home = tempdir().unwrap();
    let config_dir = home.path().join(".config").join("password2h");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("hasher.json"),
        br#"{"time":3,"memory":256,"threads":1}"#,
    )
    .unwrap();

    bin_with_home(home.path())
        .arg("params")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"time\": 3"))
        .stdout(predicate::str::contains("\"memory\": 256"));

    bin()
        .arg("params")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"time\": 1"))
        .stdout(predicate::str::contains("\"memory\": 65536"));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempdir().unwrap();

    bin()
        .arg("--config")
        .arg(dir.path().join("missing.json"))
        .arg("params")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn invalid_parameters_fail() {
    bin()
        .env("P2H_PASSWORD", "pw")
        .args(["--time", "1", "--memory", "64", "--threads", "0"])
        .arg("hash")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid Argon2 parameters"));
}

#[test]
fn verify_requires_hash_argument() {
    bin()
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
