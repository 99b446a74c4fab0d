//! Integration and unit tests for main.rs
use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn help_lists_commands() {
    let mut cmd = Command::cargo_bin("advodir").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("start"))
        .stdout(contains("validate-env"));
}

#[test]
fn unknown_command_fails() {
    let mut cmd = Command::cargo_bin("advodir").unwrap();
    cmd.arg("frobnicate");
    cmd.assert().failure();
}

#[test]
fn validate_env_reports_configuration() {
    let mut cmd = Command::cargo_bin("advodir").unwrap();
    cmd.arg("validate-env")
        .env_remove("ADVODIR_HOST")
        .env_remove("ADVODIR_PORT")
        .env_remove("ADVODIR_RATE_LIMIT_WINDOW_SECS")
        .env_remove("ADVODIR_RATE_LIMIT_MAX_REQUESTS");
    cmd.assert()
        .success()
        .stdout(contains("Environment OK"))
        .stdout(contains("60 requests / 60s window"));
}

#[test]
fn validate_env_rejects_zero_rate_limit_window() {
    let mut cmd = Command::cargo_bin("advodir").unwrap();
    cmd.arg("validate-env")
        .env("ADVODIR_RATE_LIMIT_WINDOW_SECS", "0");
    cmd.assert()
        .failure()
        .stderr(contains("ADVODIR_RATE_LIMIT_WINDOW_SECS"));
}

#[test]
fn validate_env_rejects_invalid_host() {
    let mut cmd = Command::cargo_bin("advodir").unwrap();
    cmd.arg("validate-env").env("ADVODIR_HOST", "not-an-ip");
    cmd.assert().failure().stderr(contains("Invalid IP address"));
}
