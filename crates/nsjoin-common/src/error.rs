//! Unified error types for the nsjoin workspace.
//!
//! [`NsjoinError`] is propagated with `?`. [`JoinFailure`] is never
//! propagated: it is recorded per namespace kind and the join loop moves on.

use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

use crate::types::NamespaceKind;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum NsjoinError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// The target process identifier cannot name a process.
    #[error("invalid target pid {value:?}: expected a positive decimal number")]
    InvalidTargetPid {
        /// The rejected value, verbatim.
        value: String,
    },

    /// More than one thread exists, so mount and pid joins are unsafe.
    #[error("namespace join requires a single-threaded process, found {threads} threads")]
    ConcurrencyStarted {
        /// Number of threads observed in the calling process.
        threads: usize,
    },

    /// No command interpreter could be located.
    #[error("no command interpreter available (tried {shell} and sh on PATH)")]
    ShellUnavailable {
        /// The configured interpreter path.
        shell: PathBuf,
    },

    /// The command could not be started or waited on.
    #[error("failed to run command {command:?}: {source}")]
    CommandSpawn {
        /// Command line that failed.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Reason a single namespace kind could not be joined.
#[derive(Debug, Error)]
pub enum JoinFailure {
    /// The namespace handle of the target process could not be opened.
    #[error("cannot open {path}: {source}")]
    HandleUnavailable {
        /// Handle path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The kernel rejected the `setns(2)` call.
    #[error("setns on {kind} namespace failed: {source}")]
    JoinRejected {
        /// Namespace kind being joined.
        kind: NamespaceKind,
        /// Kernel error number.
        source: Errno,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, NsjoinError>;
