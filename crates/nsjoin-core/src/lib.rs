//! # nsjoin-core
//!
//! Joins the Linux namespaces of an already-running process and runs a
//! command inside them.
//!
//! The sequence is a single pass:
//! - **Gate** ([`gate`]): both activation signals present, or return to
//!   normal startup untouched.
//! - **Join** ([`namespace`]): `ipc`, `uts`, `net`, `pid`, `mnt`, in that
//!   order, each attempt independent and non-fatal.
//! - **Run** ([`command`]): the command line through `/bin/sh -c`.
//! - **Terminate** ([`terminate`]): exit without returning to the caller.
//!
//! [`hook::pre_main`] must be the first call in `main`, before any thread,
//! thread pool, or async runtime exists. Joining the mount and pid
//! namespaces is only well-defined in a single-threaded process;
//! [`preflight`] refuses to proceed otherwise.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod command;
pub mod gate;
pub mod hook;
pub mod namespace;
pub mod preflight;
pub mod terminate;
