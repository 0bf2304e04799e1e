//! Entry point tying the gate, joiner, runner, and terminator together.

use nsjoin_common::config::ActivationSignals;
use nsjoin_common::error::Result;
use nsjoin_common::types::{CommandResult, JoinOutcome};

use crate::command::{CommandRunner, ShellRunner};
use crate::gate::{self, Activation, JoinRequest};
use crate::namespace::{self, LinuxSyscall, NamespaceSyscall};
use crate::{preflight, terminate};

/// Everything observed during one join-and-run pass.
#[derive(Debug)]
pub struct ExecReport {
    /// One outcome per namespace kind, in join order.
    pub outcomes: Vec<JoinOutcome>,
    /// How the command terminated.
    pub result: CommandResult,
}

impl ExecReport {
    /// Outcomes whose join took effect.
    pub fn joined(&self) -> impl Iterator<Item = &JoinOutcome> {
        self.outcomes.iter().filter(|o| o.succeeded())
    }

    /// Outcomes whose join did not happen.
    pub fn failed(&self) -> impl Iterator<Item = &JoinOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}

/// Runs the hook for this process.
///
/// Returns `Ok(())` when either signal is missing, leaving the process
/// untouched. Otherwise joins the target's namespaces, runs the command, and
/// exits the process without returning.
///
/// Must be the first call in `main`, before any additional thread, thread
/// pool, or async runtime has been started.
///
/// # Errors
///
/// Returns an error if the process is already multi-threaded or if the
/// command cannot be launched. Both are fatal to the caller; per-namespace
/// failures never are.
pub fn pre_main(signals: &ActivationSignals) -> Result<()> {
    let request = match gate::evaluate(signals) {
        Activation::Inactive => return Ok(()),
        Activation::Active(request) => request,
    };

    preflight::ensure_single_threaded()?;
    let report = join_and_run(&request, &LinuxSyscall, &ShellRunner::default())?;
    terminate::terminate(request.exit_policy, &report.result)
}

/// Joins every namespace of the target, then runs the command exactly once.
///
/// The command runs regardless of how many joins succeeded.
///
/// # Errors
///
/// Returns an error only if the command could not be launched.
pub fn join_and_run(
    request: &JoinRequest,
    syscall: &dyn NamespaceSyscall,
    runner: &dyn CommandRunner,
) -> Result<ExecReport> {
    let outcomes = namespace::join_target(&request.pid, syscall);
    let joined = outcomes.iter().filter(|o| o.succeeded()).count();
    tracing::info!(
        pid = request.pid.as_str(),
        joined,
        failed = outcomes.len() - joined,
        "namespace join finished"
    );

    let result = runner.run(&request.command)?;
    Ok(ExecReport { outcomes, result })
}
