//! Lifecycle terminator.
//!
//! After the command has run, the process may not fall back into the host
//! program: its namespace membership no longer matches what the rest of
//! `main` expects.

use std::io::Write;

use nsjoin_common::types::{CommandResult, ExitPolicy};

/// Exit code for `result` under `policy`.
#[must_use]
pub const fn exit_code(policy: ExitPolicy, result: &CommandResult) -> i32 {
    policy.exit_code(result)
}

/// Flushes standard streams and exits the process.
pub fn terminate(policy: ExitPolicy, result: &CommandResult) -> ! {
    let code = exit_code(policy, result);
    tracing::debug!(%policy, code, "terminating after namespace exec");
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
    std::process::exit(code)
}
