//! Domain primitive types used across the nsjoin workspace.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::PROC_ROOT;
use crate::error::{JoinFailure, NsjoinError, Result};

/// Identifier of the process whose namespaces are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetPid(u32);

impl TargetPid {
    /// Parses a decimal process identifier.
    ///
    /// # Errors
    ///
    /// Returns [`NsjoinError::InvalidTargetPid`] unless the value is made of
    /// ASCII digits only and is non-zero.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || NsjoinError::InvalidTargetPid {
            value: value.to_string(),
        };
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        match value.parse::<u32>() {
            Ok(0) | Err(_) => Err(invalid()),
            Ok(pid) => Ok(Self(pid)),
        }
    }

    /// Wraps a raw pid, typically one read from the state index.
    #[must_use]
    pub const fn from_raw(pid: u32) -> Self {
        Self(pid)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns `/proc/<pid>`.
    #[must_use]
    pub fn proc_dir(self) -> PathBuf {
        PathBuf::from(PROC_ROOT).join(self.0.to_string())
    }
}

impl fmt::Display for TargetPid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Namespace kinds joined by the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    /// System V IPC objects and POSIX message queues.
    Ipc,
    /// Hostname and NIS domain name.
    Uts,
    /// Network devices, stacks, ports.
    Net,
    /// Process ID number space.
    Pid,
    /// Mount table.
    Mnt,
}

impl NamespaceKind {
    /// Every kind, in the order joins are attempted.
    pub const JOIN_ORDER: [Self; 5] = [Self::Ipc, Self::Uts, Self::Net, Self::Pid, Self::Mnt];

    /// File name of this kind under `/proc/<pid>/ns/`.
    #[must_use]
    pub const fn proc_name(self) -> &'static str {
        match self {
            Self::Ipc => "ipc",
            Self::Uts => "uts",
            Self::Net => "net",
            Self::Pid => "pid",
            Self::Mnt => "mnt",
        }
    }

    /// Returns `/proc/<pid>/ns/<kind>`.
    #[must_use]
    pub fn handle_path(self, pid: TargetPid) -> PathBuf {
        pid.proc_dir().join("ns").join(self.proc_name())
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.proc_name())
    }
}

/// Result of a single join attempt.
#[derive(Debug)]
pub enum JoinStatus {
    /// The calling thread now belongs to the target's namespace.
    Succeeded,
    /// The join did not happen; membership for this kind is unchanged.
    Failed(JoinFailure),
}

/// Outcome of joining one namespace kind.
#[derive(Debug)]
pub struct JoinOutcome {
    /// Kind that was attempted.
    pub kind: NamespaceKind,
    /// Handle path that was opened.
    pub path: PathBuf,
    /// Whether the join took effect.
    pub status: JoinStatus,
}

impl JoinOutcome {
    /// Returns `true` if the join took effect.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.status, JoinStatus::Succeeded)
    }
}

/// Termination status of the command run in the joined context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code, if the command exited normally.
    pub code: Option<i32>,
    /// Signal that terminated the command, if any.
    pub signal: Option<i32>,
}

impl CommandResult {
    /// Returns `true` if the command exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Shell-style status: the exit code, `128 + signal`, or `1`.
    #[must_use]
    pub const fn shell_status(&self) -> i32 {
        match (self.code, self.signal) {
            (Some(code), _) => code,
            (None, Some(signal)) => 128 + signal,
            (None, None) => 1,
        }
    }
}

/// How the hosting process exits after the command has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Always exit with status 0, discarding the command's status.
    #[default]
    AlwaysSuccess,
    /// Exit with the command's shell-style status.
    Propagate,
}

impl ExitPolicy {
    /// Exit code the terminator uses for `result`.
    #[must_use]
    pub const fn exit_code(self, result: &CommandResult) -> i32 {
        match self {
            Self::AlwaysSuccess => 0,
            Self::Propagate => result.shell_status(),
        }
    }

    /// Value used in the `NSJOIN_EXIT_POLICY` variable.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlwaysSuccess => "always-success",
            Self::Propagate => "propagate",
        }
    }
}

impl FromStr for ExitPolicy {
    type Err = NsjoinError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "always-success" => Ok(Self::AlwaysSuccess),
            "propagate" => Ok(Self::Propagate),
            other => Err(NsjoinError::Config {
                message: format!("unknown exit policy: {other}"),
            }),
        }
    }
}

impl fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a container, as recorded in the state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    /// Container has been created but not yet started.
    Created,
    /// Container is actively running.
    Running,
    /// Container has been stopped.
    Stopped,
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}
