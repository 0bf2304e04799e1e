//! Exec launcher.
//!
//! Namespace joins must happen before any thread exists, so the launcher
//! does not join anything itself. It re-launches the current executable
//! with the activation signals in its environment; the hook at the top of
//! that process's `main` does the join and runs the command.

use std::path::Path;
use std::process::{Command, ExitStatus};

use nsjoin_common::config::ActivationSignals;
use nsjoin_common::constants::SELF_EXE;
use nsjoin_common::error::{NsjoinError, Result};
use nsjoin_common::types::{ExitPolicy, TargetPid};

/// A request to run a command inside a running process's namespaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    /// Process whose namespaces are joined.
    pub pid: TargetPid,
    /// Command and arguments.
    pub command: Vec<String>,
    /// Exit code selection of the re-launched process.
    pub exit_policy: ExitPolicy,
}

impl ExecRequest {
    /// Activation signals handed to the re-launched process.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the command is empty.
    pub fn signals(&self) -> Result<ActivationSignals> {
        let line = command_line(&self.command);
        if line.trim().is_empty() {
            return Err(NsjoinError::Config {
                message: "exec command is empty".into(),
            });
        }
        let pid = self.pid.to_string();
        Ok(ActivationSignals::new(Some(pid.as_str()), Some(line.as_str()))
            .with_exit_policy(self.exit_policy))
    }
}

/// Joins an argument vector into the single command line the hook runs.
#[must_use]
pub fn command_line(args: &[String]) -> String {
    args.join(" ")
}

/// Splits a NUL-separated environment block into key/value pairs.
///
/// Empty entries and entries without `=` are dropped.
#[must_use]
pub fn parse_environ(block: &[u8]) -> Vec<(String, String)> {
    block
        .split(|&b| b == 0)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let entry = String::from_utf8_lossy(entry);
            let (key, value) = entry.split_once('=')?;
            (!key.is_empty()).then(|| (key.to_owned(), value.to_owned()))
        })
        .collect()
}

/// Reads the environment of `pid` from `/proc/<pid>/environ`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_target_environ(pid: TargetPid) -> Result<Vec<(String, String)>> {
    let path = pid.proc_dir().join("environ");
    let block = std::fs::read(&path).map_err(|e| NsjoinError::Io { path, source: e })?;
    Ok(parse_environ(&block))
}

/// Builds the re-launch command without spawning it.
///
/// The child inherits our environment, then the target's environment, then
/// the activation signals, so the target cannot override the signals.
///
/// # Errors
///
/// Returns a configuration error if the command is empty.
pub fn build_command(
    exe: &Path,
    request: &ExecRequest,
    target_env: &[(String, String)],
) -> Result<Command> {
    let signals = request.signals()?;
    let mut cmd = Command::new(exe);
    let _ = cmd
        .envs(target_env.iter().map(|(k, v)| (k, v)))
        .envs(signals.to_env());
    Ok(cmd)
}

/// Re-launches the current executable to run the request, and waits.
///
/// If the target's environment cannot be read, the command still runs
/// with ours.
///
/// # Errors
///
/// Returns an error if the command is empty or the process cannot be
/// spawned.
pub fn launch(request: &ExecRequest) -> Result<ExitStatus> {
    launch_with(Path::new(SELF_EXE), request)
}

/// Same as [`launch`] with an explicit executable.
///
/// # Errors
///
/// Returns an error if the command is empty or the process cannot be
/// spawned.
pub fn launch_with(exe: &Path, request: &ExecRequest) -> Result<ExitStatus> {
    let target_env = read_target_environ(request.pid).unwrap_or_else(|e| {
        tracing::error!(pid = %request.pid, error = %e, "reading target environment failed");
        Vec::new()
    });

    tracing::info!(
        pid = %request.pid,
        cmd = %command_line(&request.command),
        "exec into target namespaces"
    );
    build_command(exe, request, &target_env)?
        .status()
        .map_err(|e| NsjoinError::Io {
            path: exe.to_path_buf(),
            source: e,
        })
}
