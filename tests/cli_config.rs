use assert_cmd::Command;
use predicates::prelude::*;

fn scrive(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scrive").unwrap();
    cmd.env("HOME", home.path());
    cmd
}

#[test]
fn config_create_writes_defaults_once() {
    let home = tempfile::tempdir().unwrap();

    scrive(&home)
        .args(["config", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Configuration file created with default settings.",
        ));

    scrive(&home)
        .args(["config", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config already exists"));
}

#[test]
fn config_show_never_prints_api_keys() {
    let home = tempfile::tempdir().unwrap();

    scrive(&home)
        .args(["config", "update", "--provider", "openai", "--api-key", "XYZ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration updated successfully."));

    scrive(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("openai:"))
        .stdout(predicate::str::contains("<redacted>"))
        .stdout(predicate::str::contains("XYZ").not());
}

#[test]
fn config_update_refuses_an_empty_request() {
    let home = tempfile::tempdir().unwrap();

    scrive(&home)
        .args(["config", "update"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No settings to update"));
}

#[test]
fn config_update_can_set_the_default_provider() {
    let home = tempfile::tempdir().unwrap();

    scrive(&home)
        .args(["config", "update", "--provider", "ollama", "--set-default"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default provider set to: ollama"));

    scrive(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default Provider: ollama"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    let home = tempfile::tempdir().unwrap();

    scrive(&home).arg("frobnicate").assert().failure();
}
