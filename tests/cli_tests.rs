//! CLI integration tests

use std::process::Command;

fn desk_notify_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_desk-notify"))
}

#[test]
fn help_output() {
    let output = desk_notify_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("notification"));
    assert!(stdout.contains("--title"));
    assert!(stdout.contains("--body"));
    assert!(stdout.contains("--reply"));
    assert!(stdout.contains("--wait"));
    assert!(stdout.contains("--backend"));
}

#[test]
fn version_output() {
    let output = desk_notify_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("desk-notify"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let output = desk_notify_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("desk-notify"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_help() {
    let output = desk_notify_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn send_with_none_backend_succeeds() {
    // The none backend displays nothing, so this is safe anywhere.
    let output = desk_notify_bin()
        .args([
            "--backend",
            "none",
            "-i",
            "test-1",
            "-t",
            "Hello",
            "-b",
            "World",
        ])
        .env_remove("DESK_NOTIFY_BACKEND")
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("sent") || stderr.contains("none"),
        "Expected send confirmation, got: {}",
        stderr
    );
}

#[test]
fn wait_timeout_requires_wait_flag() {
    let output = desk_notify_bin()
        .args(["--backend", "none", "--wait-timeout", "5"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("--wait") || stderr.contains("required"),
        "Expected error about missing --wait, got: {}",
        stderr
    );
}

// Note: --wait with the none backend is covered by unit tests on the
// notification center. An integration test would wait for an activation
// that never arrives.
