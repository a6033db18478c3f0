#![allow(deprecated)] // TODO: move from Command::cargo_bin to the cargo_bin_cmd! macro

use assert_cmd::Command;
use predicates::prelude::*;

fn release_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("hydrangea_bundler_deb").unwrap();
    cmd.current_dir(dir)
        .env_remove("HYDRANGEA_BUILD_SCRIPTS_DIR")
        .env_remove("HYDRANGEA_RELEASE_CONFIG")
        .env_remove("HYDRANGEA_INSTALLER_VERSION")
        .env("NO_COLOR", "1");
    cmd
}

/// Writes an executable `npm` into `bin` that exits with `code`.
#[cfg(unix)]
fn fake_npm(bin: &std::path::Path, code: i32) {
    use std::os::unix::fs::PermissionsExt;

    let npm = bin.join("npm");
    std::fs::write(&npm, format!("#!/bin/sh\nexit {code}\n")).unwrap();
    std::fs::set_permissions(&npm, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn is_empty_dir(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

/// Help lists the positional platform argument
#[test]
fn test_cli_help() {
    let dir = tempfile::tempdir().unwrap();
    release_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PLATFORM"))
        .stdout(predicate::str::contains("--build-scripts-dir"));
}

/// Missing platform is a usage error that touches nothing
#[test]
fn test_missing_platform() {
    let dir = tempfile::tempdir().unwrap();
    release_cmd(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PLATFORM"))
        .stderr(predicate::str::contains("Usage: hydrangea_bundler_deb <amd64|arm64>"));

    assert!(is_empty_dir(dir.path()));
}

/// Unknown platform fails before any stage runs
#[test]
fn test_unknown_platform() {
    let dir = tempfile::tempdir().unwrap();
    release_cmd(dir.path())
        .arg("x86")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsupported platform 'x86'"));

    assert!(is_empty_dir(dir.path()));
}

/// Unknown flags are usage errors too
#[test]
fn test_unknown_flag() {
    let dir = tempfile::tempdir().unwrap();
    release_cmd(dir.path())
        .args(["--rebuild-image", "amd64"])
        .assert()
        .code(1);

    assert!(is_empty_dir(dir.path()));
}

/// A malformed config file stops the run before any stage
#[test]
fn test_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("release.toml"), "[tools]\nyarn = 1\n").unwrap();

    release_cmd(dir.path())
        .args(["--config", "release.toml", "amd64"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid config"));

    assert!(!dir.path().join("dist").exists());
    assert!(!dir.path().join("final_installer").exists());
}

/// A tool missing from PATH aborts at the first stage with 127
#[test]
fn test_missing_tool_names_stage() {
    let dir = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("npm_linux_deb")).unwrap();

    release_cmd(dir.path())
        .env("PATH", empty_path.path())
        .arg("amd64")
        .assert()
        .code(127)
        .stderr(predicate::str::contains("install packaging tools"))
        .stderr(predicate::str::contains("`npm` not found"));

    assert!(!dir.path().join("dist").exists());
}

/// Without the version variable the run warns and falls back to 0.0.0
#[cfg(unix)]
#[test]
fn test_unset_version_warns_with_default() {
    let dir = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    fake_npm(bin.path(), 3);
    std::fs::create_dir(dir.path().join("npm_linux_deb")).unwrap();

    release_cmd(dir.path())
        .env("PATH", bin.path())
        .arg("amd64")
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "No environment variable HYDRANGEA_INSTALLER_VERSION set. Using 0.0.0.",
        ))
        .stderr(predicate::str::contains("install packaging tools"));
}

/// --verbose shows each tool invocation, the default view does not
#[cfg(unix)]
#[test]
fn test_verbose_lists_tool_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    fake_npm(bin.path(), 3);
    std::fs::create_dir(dir.path().join("npm_linux_deb")).unwrap();

    release_cmd(dir.path())
        .env("PATH", bin.path())
        .env("HYDRANGEA_INSTALLER_VERSION", "1.4.0")
        .args(["--verbose", "amd64"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Running `npm ci` in"))
        .stdout(predicate::str::contains("Resolved npm to"));

    release_cmd(dir.path())
        .env("PATH", bin.path())
        .env("HYDRANGEA_INSTALLER_VERSION", "1.4.0")
        .arg("amd64")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Running").not())
        .stderr(predicate::str::contains("No environment variable").not());
}
