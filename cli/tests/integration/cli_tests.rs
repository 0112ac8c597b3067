//! Integration tests for argument parsing, help output and error reporting.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn promctl() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("promctl"));
    cmd.env("NO_COLOR", "1").env_remove("PROMCTL_SETTINGS");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    promctl().assert().code(2).stderr(predicate::str::contains(
        "Install, configure and remove a Prometheus server",
    ));
}

#[test]
fn test_cli_help_lists_lifecycle_commands() {
    promctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("add-target"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("menu"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    promctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("promctl"));
}

#[test]
fn test_add_target_help_shows_flags() {
    promctl()
        .args(["add-target", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--job"))
        .stdout(predicate::str::contains("--no-restart"));
}

#[test]
fn test_remove_help_shows_delete_principals() {
    promctl()
        .args(["remove", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--delete-principals"));
}

#[test]
fn test_add_target_rejects_address_without_port() {
    promctl()
        .args(["add-target", "10.0.0.5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("host:port"));
}

#[test]
fn test_add_target_rejects_port_out_of_range() {
    promctl()
        .args(["add-target", "10.0.0.5:70000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("1-65535"));
}

#[test]
fn test_unknown_command_fails() {
    promctl().arg("frobnicate").assert().failure();
}

#[test]
fn test_invalid_settings_file_is_reported_before_any_work() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("settings.yaml");
    std::fs::write(&settings, "release:\n  version: latest\n").expect("write");

    promctl()
        .arg("--settings")
        .arg(&settings)
        .args(["add-target", "10.0.0.5:9100", "--no-restart"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("latest"));
}

#[test]
fn test_invalid_settings_json_error_has_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("settings.yaml");
    std::fs::write(&settings, "service:\n  user: Not-Valid\n").expect("write");

    let output = promctl()
        .arg("--json")
        .arg("--settings")
        .arg(&settings)
        .arg("status")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "invalid_settings");
}

#[test]
fn test_missing_explicit_settings_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    promctl()
        .env("PROMCTL_SETTINGS", dir.path().join("absent.yaml"))
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read settings file"));
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("settings.yaml");
    std::fs::write(&settings, "release:\n  version: latest\n").expect("write");

    for value in ["1", "yes", "", "0"] {
        promctl()
            .env("NO_COLOR", value)
            .arg("--settings")
            .arg(&settings)
            .arg("status")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("release.version"))
            .stderr(predicate::str::contains("--no-color").not());
    }
}

#[test]
fn test_no_color_flag_still_parses() {
    promctl()
        .env_remove("NO_COLOR")
        .args(["--no-color", "add-target", "10.0.0.5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("host:port"));
}
