//! Command runner.
//!
//! Runs the command line through the shell in whatever namespaces the
//! joiner left the process in, and blocks until it completes.

use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use nsjoin_common::constants::DEFAULT_SHELL;
use nsjoin_common::error::{NsjoinError, Result};
use nsjoin_common::types::CommandResult;

/// Executes a command line and reports how it terminated.
pub trait CommandRunner {
    /// Runs `command_line` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error only if the command could not be launched at all.
    fn run(&self, command_line: &str) -> Result<CommandResult>;
}

/// Runs command lines with `<shell> -c`, inheriting stdio.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    /// Creates a runner using the given interpreter.
    #[must_use]
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Returns the interpreter that will run commands.
    ///
    /// Falls back to `sh` on `PATH` when the configured path is missing.
    ///
    /// # Errors
    ///
    /// Returns [`NsjoinError::ShellUnavailable`] if neither exists.
    pub fn resolve_shell(&self) -> Result<PathBuf> {
        if self.shell.is_file() {
            return Ok(self.shell.clone());
        }
        which::which("sh").map_err(|_| NsjoinError::ShellUnavailable {
            shell: self.shell.clone(),
        })
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<CommandResult> {
        let shell = self.resolve_shell()?;
        tracing::info!(shell = %shell.display(), command = command_line, "running command");

        let status = spawn_and_wait(&shell, command_line)?;
        let result = command_result(status);
        tracing::info!(code = ?result.code, signal = ?result.signal, "command finished");
        Ok(result)
    }
}

fn spawn_and_wait(shell: &Path, command_line: &str) -> Result<ExitStatus> {
    Command::new(shell)
        .arg("-c")
        .arg(command_line)
        .status()
        .map_err(|source| NsjoinError::CommandSpawn {
            command: command_line.to_owned(),
            source,
        })
}

fn command_result(status: ExitStatus) -> CommandResult {
    CommandResult {
        code: status.code(),
        signal: status.signal(),
    }
}
