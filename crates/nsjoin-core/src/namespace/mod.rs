//! Namespace joiner.
//!
//! Walks [`NamespaceKind::JOIN_ORDER`] and tries to join each namespace of
//! the target process. Every attempt is fully resolved (opened, joined or
//! failed, handle closed) before the next one starts. Failures are recorded
//! and logged, never propagated.

pub mod syscall;

use std::io;
use std::os::fd::AsFd;
use std::path::PathBuf;

use nsjoin_common::constants::PROC_ROOT;
use nsjoin_common::error::{JoinFailure, NsjoinError};
use nsjoin_common::types::{JoinOutcome, JoinStatus, NamespaceKind, TargetPid};

pub use self::syscall::{LinuxSyscall, NamespaceSyscall, clone_flag};

/// Attempts to join all five namespaces of the process named by `raw_pid`.
///
/// A value that is not a process id fails every kind with
/// [`JoinFailure::HandleUnavailable`] without touching the filesystem.
pub fn join_target(raw_pid: &str, syscall: &dyn NamespaceSyscall) -> Vec<JoinOutcome> {
    match TargetPid::parse(raw_pid) {
        Ok(pid) => join_all(pid, syscall),
        Err(e) => {
            tracing::warn!(pid = raw_pid, error = %e, "target pid does not name a process");
            NamespaceKind::JOIN_ORDER
                .into_iter()
                .map(|kind| unavailable(raw_pid, kind, &e))
                .collect()
        }
    }
}

fn unavailable(raw_pid: &str, kind: NamespaceKind, reason: &NsjoinError) -> JoinOutcome {
    let path = PathBuf::from(format!("{PROC_ROOT}/{raw_pid}/ns/{kind}"));
    let failure = JoinFailure::HandleUnavailable {
        path: path.clone(),
        source: io::Error::new(io::ErrorKind::InvalidInput, reason.to_string()),
    };
    tracing::warn!(%kind, path = %path.display(), error = %failure, "namespace handle unavailable");
    JoinOutcome {
        kind,
        path,
        status: JoinStatus::Failed(failure),
    }
}

/// Attempts to join all five namespaces of `pid`, in order.
///
/// Always returns one outcome per kind, in [`NamespaceKind::JOIN_ORDER`].
pub fn join_all(pid: TargetPid, syscall: &dyn NamespaceSyscall) -> Vec<JoinOutcome> {
    NamespaceKind::JOIN_ORDER
        .into_iter()
        .map(|kind| join_one(pid, kind, syscall))
        .collect()
}

/// Attempts to join a single namespace kind of `pid`.
pub fn join_one(pid: TargetPid, kind: NamespaceKind, syscall: &dyn NamespaceSyscall) -> JoinOutcome {
    let path = kind.handle_path(pid);

    let fd = match syscall.open_namespace(kind, &path) {
        Ok(fd) => fd,
        Err(source) => {
            let failure = JoinFailure::HandleUnavailable {
                path: path.clone(),
                source,
            };
            tracing::warn!(%kind, path = %path.display(), error = %failure, "namespace handle unavailable");
            return JoinOutcome {
                kind,
                path,
                status: JoinStatus::Failed(failure),
            };
        }
    };

    let status = match syscall.set_namespace(kind, fd.as_fd()) {
        Ok(()) => {
            tracing::info!(%kind, pid = %pid, "setns on {kind} namespace succeeded");
            JoinStatus::Succeeded
        }
        Err(source) => {
            let failure = JoinFailure::JoinRejected { kind, source };
            tracing::warn!(%kind, pid = %pid, error = %failure, "namespace join rejected");
            JoinStatus::Failed(failure)
        }
    };
    drop(fd);

    JoinOutcome { kind, path, status }
}
