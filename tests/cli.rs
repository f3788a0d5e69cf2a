use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary home directory
fn temp_home_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp home
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".indicator-dashboard").join("config.json")
}

const BINARY_NAME: &str = "indicator-dashboard";

#[test]
/// Help command should list the subcommands.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Usage"))
        .stdout(contains("start"))
        .stdout(contains("upload-image"));
}

#[test]
fn config_command_saves_and_resets() {
    let tmp = temp_home_dir();
    let config_path = config_file_path(&tmp);
    assert!(!config_path.exists());

    Command::cargo_bin(BINARY_NAME)
        .unwrap()
        .args(["config", "--api-url", "http://10.1.1.1:5000", "--reconnect-ms", "2500"])
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stdout(contains("http://10.1.1.1:5000"));

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("\"reconnect_interval_ms\": 2500"));

    Command::cargo_bin(BINARY_NAME)
        .unwrap()
        .args(["config", "--reset"])
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stdout(contains("Configuration reset"));

    assert!(!config_path.exists());
}

#[test]
/// A zero reconnect delay is refused and nothing is saved.
fn config_command_rejects_zero_reconnect_delay() {
    let tmp = temp_home_dir();
    Command::cargo_bin(BINARY_NAME)
        .unwrap()
        .args(["config", "--reconnect-ms", "0"])
        .env("HOME", tmp.path())
        .assert()
        .failure()
        .stderr(contains("--reconnect-ms"));

    assert!(!config_file_path(&tmp).exists());
}

#[test]
fn background_command_prints_image_url() {
    let tmp = temp_home_dir();
    Command::cargo_bin(BINARY_NAME)
        .unwrap()
        .args(["background", "3"])
        .env("HOME", tmp.path())
        .env("DASHBOARD_API_URL", "http://dashboard.test:8080")
        .assert()
        .success()
        .stdout(contains("http://dashboard.test:8080/api/BackgroundImage/3"));
}

#[test]
fn upload_of_missing_file_fails() {
    let tmp = temp_home_dir();
    Command::cargo_bin(BINARY_NAME)
        .unwrap()
        .args(["upload-image", "/nonexistent/picture.png"])
        .env("HOME", tmp.path())
        .env("DASHBOARD_API_URL", "http://127.0.0.1:9")
        .assert()
        .failure()
        .stderr(contains("Request failed"));
}
