//! Integration tests for the dephandler binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".dephandler");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yml"), config).unwrap();
    temp
}

/// Run in `temp` with no user-level config and no interpreter override.
fn dephandler(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("dephandler"));
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env("NO_COLOR", "1")
        .env_remove("DEPHANDLER_PYTHON");
    cmd
}

// An interpreter that cannot be started: every import fails.
const UNUSABLE_CONFIG: &str = r#"
python: /nonexistent/dephandler/python
printers: []
dependencies:
  - NEM
  - name: PIL
    pip_name: Pillow
    min: "9.0"
"#;

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    dephandler(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("optional Python dependencies"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    dephandler(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_no_config_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    dephandler(&temp)
        .arg("status")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No configuration found"));
    Ok(())
}

#[test]
fn cli_status_lists_missing_dependencies() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(UNUSABLE_CONFIG);
    dephandler(&temp)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Status"))
        .stderr(predicate::str::contains("NEM: not installed"))
        .stderr(predicate::str::contains("PIL (Pillow): not installed"));
    Ok(())
}

#[test]
fn cli_status_json_is_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(UNUSABLE_CONFIG);
    let output = dephandler(&temp).args(["status", "--json"]).output()?;
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["dependencies_imported"], false);
    assert_eq!(report["restart_needed"], false);
    let deps = report["dependencies"].as_array().unwrap();
    assert_eq!(deps.len(), 2);
    assert_eq!(deps[1]["name"], "PIL");
    assert_eq!(deps[1]["pip_name"], "Pillow");
    assert_eq!(deps[1]["installed"], false);
    Ok(())
}

#[test]
fn cli_config_flag_loads_that_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let path = temp.path().join("deps.yml");
    fs::write(&path, UNUSABLE_CONFIG)?;
    dephandler(&temp)
        .args(["status", "--json", "--config"])
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"NEM\""));
    Ok(())
}

#[test]
fn cli_install_with_unusable_interpreter_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(UNUSABLE_CONFIG);
    dephandler(&temp)
        .arg("install")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Installation aborted"));
    Ok(())
}

#[test]
fn cli_update_pin_with_two_names_exits_2() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(UNUSABLE_CONFIG);
    dephandler(&temp)
        .args(["update", "NEM", "PIL", "--to", "1.0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--to needs exactly one dependency"));
    Ok(())
}

#[test]
fn cli_update_with_unusable_interpreter_has_nothing_to_do() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(UNUSABLE_CONFIG);
    dephandler(&temp)
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("No updates available"));
    Ok(())
}

#[test]
fn cli_invalid_printer_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("printers: [fax]\ndependencies: [numpy]\n");
    dephandler(&temp)
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("fax"));
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    dephandler(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dephandler"));
    Ok(())
}

#[test]
fn cli_invalid_command_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    dephandler(&temp).arg("invalid-command").assert().failure();
    Ok(())
}

#[test]
fn cli_debug_flag_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    dephandler(&temp).args(["--debug", "--help"]).assert().success();
    Ok(())
}
