//! Kernel operations behind the joiner.
//!
//! The joiner only talks to [`NamespaceSyscall`], so tests can observe the
//! exact sequence of opens and joins without privileges.

use std::fs::File;
use std::io;
use std::os::fd::{BorrowedFd, OwnedFd};
use std::path::Path;

use nix::sched::{CloneFlags, setns};
use nsjoin_common::types::NamespaceKind;

/// Opens namespace handles and associates the calling thread with them.
pub trait NamespaceSyscall {
    /// Opens the handle at `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns the I/O error reported by `open(2)`.
    fn open_namespace(&self, kind: NamespaceKind, path: &Path) -> io::Result<OwnedFd>;

    /// Moves the calling thread into the namespace referred to by `fd`.
    ///
    /// # Errors
    ///
    /// Returns the errno reported by `setns(2)`.
    fn set_namespace(&self, kind: NamespaceKind, fd: BorrowedFd<'_>) -> nix::Result<()>;
}

/// Real implementation backed by procfs and `setns(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxSyscall;

impl NamespaceSyscall for LinuxSyscall {
    fn open_namespace(&self, _kind: NamespaceKind, path: &Path) -> io::Result<OwnedFd> {
        File::open(path).map(OwnedFd::from)
    }

    fn set_namespace(&self, kind: NamespaceKind, fd: BorrowedFd<'_>) -> nix::Result<()> {
        setns(fd, clone_flag(kind))
    }
}

/// `CLONE_NEW*` flag for a kind, so the kernel checks the handle type.
#[must_use]
pub const fn clone_flag(kind: NamespaceKind) -> CloneFlags {
    match kind {
        NamespaceKind::Ipc => CloneFlags::CLONE_NEWIPC,
        NamespaceKind::Uts => CloneFlags::CLONE_NEWUTS,
        NamespaceKind::Net => CloneFlags::CLONE_NEWNET,
        NamespaceKind::Pid => CloneFlags::CLONE_NEWPID,
        NamespaceKind::Mnt => CloneFlags::CLONE_NEWNS,
    }
}
