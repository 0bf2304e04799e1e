//! Runs the `nsj` binary with activation signals in its environment.
//!
//! The hook runs before argument parsing, so every test passes `ps` with a
//! private state file: seeing its output means normal startup was reached.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;
use std::process::{Command, Output};

const NORMAL_STARTUP_MARKER: &str = "No containers found.";

fn nsj(state_dir: &Path, signals: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nsj"));
    let _ = cmd
        .arg("--state-file")
        .arg(state_dir.join("state.json"))
        .arg("ps")
        .env_remove("NSJOIN_TARGET_PID")
        .env_remove("NSJOIN_COMMAND")
        .env_remove("NSJOIN_EXIT_POLICY")
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1");
    for (key, value) in signals {
        let _ = cmd.env(key, value);
    }
    cmd.output().expect("run nsj")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn state_file_flag_leaves_home_untouched() {
    let home = tempfile::tempdir().expect("tempdir");
    let dir = tempfile::tempdir().expect("tempdir");
    let output = Command::new(env!("CARGO_BIN_EXE_nsj"))
        .arg("--state-file")
        .arg(dir.path().join("state.json"))
        .arg("ps")
        .env_remove("NSJOIN_TARGET_PID")
        .env_remove("NSJOIN_COMMAND")
        .env_remove("NSJOIN_STATE_FILE")
        .env("HOME", home.path())
        .output()
        .expect("run nsj");

    assert!(output.status.success());
    assert!(stdout(&output).contains(NORMAL_STARTUP_MARKER));
    assert!(!home.path().join(".nsjoin").exists());
}

#[test]
fn missing_pid_continues_normal_startup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = nsj(dir.path(), &[("NSJOIN_COMMAND", "/bin/true")]);
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("missing target pid"));
    assert!(!out.contains("setns"));
    assert!(!out.contains("running command"));
    assert!(out.contains(NORMAL_STARTUP_MARKER));
}

#[test]
fn missing_command_continues_normal_startup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = nsj(dir.path(), &[("NSJOIN_TARGET_PID", "1")]);
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("missing command"));
    assert!(out.contains(NORMAL_STARTUP_MARKER));
}

#[test]
fn vanished_target_fails_all_joins_and_still_runs_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = nsj(
        dir.path(),
        &[
            ("NSJOIN_TARGET_PID", "999999999"),
            ("NSJOIN_COMMAND", "echo ran-in-target"),
        ],
    );
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(out.matches("namespace handle unavailable").count(), 5);
    assert_eq!(out.lines().filter(|l| l.trim() == "ran-in-target").count(), 1);
    assert!(!out.contains(NORMAL_STARTUP_MARKER));

    let order: Vec<_> = ["ns/ipc", "ns/uts", "ns/net", "ns/pid", "ns/mnt"]
        .iter()
        .map(|kind| out.find(kind).expect("kind logged"))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn own_namespaces_run_command_exactly_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("runs.txt");
    let command = format!("echo run >> {}", marker.display());
    let pid = std::process::id().to_string();

    let output = nsj(
        dir.path(),
        &[("NSJOIN_TARGET_PID", pid.as_str()), ("NSJOIN_COMMAND", command.as_str())],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(std::fs::read_to_string(&marker).expect("marker"), "run\n");
    assert!(!stdout(&output).contains(NORMAL_STARTUP_MARKER));
}

#[test]
fn command_failure_is_discarded_by_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = nsj(
        dir.path(),
        &[
            ("NSJOIN_TARGET_PID", "999999999"),
            ("NSJOIN_COMMAND", "exit 5"),
        ],
    );
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn propagate_policy_returns_command_status() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = nsj(
        dir.path(),
        &[
            ("NSJOIN_TARGET_PID", "999999999"),
            ("NSJOIN_COMMAND", "exit 5"),
            ("NSJOIN_EXIT_POLICY", "propagate"),
        ],
    );
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn malformed_pid_fails_all_joins_and_still_runs_command() {
    for pid in ["abc", "4821x", " 1", "../1"] {
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("runs.txt");
        let command = format!("echo run >> {}", marker.display());

        let output = nsj(
            dir.path(),
            &[("NSJOIN_TARGET_PID", pid), ("NSJOIN_COMMAND", command.as_str())],
        );
        let out = stdout(&output);

        assert_eq!(output.status.code(), Some(0), "pid {pid:?}");
        assert_eq!(
            std::fs::read_to_string(&marker).expect("marker"),
            "run\n",
            "pid {pid:?}"
        );
        assert_eq!(out.matches("namespace handle unavailable").count(), 5, "pid {pid:?}");
        assert!(!out.contains(NORMAL_STARTUP_MARKER), "pid {pid:?}");
    }
}
