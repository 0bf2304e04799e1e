//! Activation gate.
//!
//! The hook runs on every start of the binary. It only engages when both
//! the target pid and the command line were handed over by the exec
//! launcher; every other invocation passes through untouched.

use nsjoin_common::config::ActivationSignals;
use nsjoin_common::types::ExitPolicy;

/// Everything the joiner and runner need once the gate has opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// Process whose namespaces are joined, verbatim from the signal.
    pub pid: String,
    /// Command line to run afterwards.
    pub command: String,
    /// Exit code selection after the command completes.
    pub exit_policy: ExitPolicy,
}

/// Decision taken by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// At least one signal is missing; continue normal startup.
    Inactive,
    /// Both signals are present; join and run.
    Active(JoinRequest),
}

/// Inspects the activation signals.
///
/// Has no side effects beyond logging. The pid is not validated here: a
/// value that names no process fails every join and the command still runs.
#[must_use]
pub fn evaluate(signals: &ActivationSignals) -> Activation {
    let Some(pid) = signals.target_pid.as_deref() else {
        tracing::info!("missing target pid, skipping namespace join");
        return Activation::Inactive;
    };
    tracing::info!(pid, "got target pid");

    let Some(command) = signals.command.as_deref() else {
        tracing::info!("missing command, skipping namespace join");
        return Activation::Inactive;
    };
    tracing::info!(command, "got command");

    let exit_policy = signals.exit_policy().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring exit policy, using {}", ExitPolicy::default());
        ExitPolicy::default()
    });

    Activation::Active(JoinRequest {
        pid: pid.to_owned(),
        command: command.to_owned(),
        exit_policy,
    })
}
