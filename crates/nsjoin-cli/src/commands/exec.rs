//! `nsj exec` — Execute a command inside a running container.

use std::os::unix::process::ExitStatusExt;

use clap::Args;
use nsjoin_common::config::NsjoinConfig;
use nsjoin_common::types::{CommandResult, ExitPolicy, TargetPid};
use nsjoin_runtime::exec::{ExecRequest, launch};
use nsjoin_runtime::state::{load_state, running_pid};

/// Arguments for the `exec` command.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Container ID or name, or a host pid with `--pid`.
    pub target: String,

    /// Treat the target as a host process id instead of a container.
    #[arg(long)]
    pub pid: bool,

    /// Exit with the command's status instead of always succeeding.
    #[arg(long)]
    pub propagate_exit: bool,

    /// Command to execute.
    #[arg(trailing_var_arg = true, required = true)]
    pub command: Vec<String>,
}

impl ExecArgs {
    fn exit_policy(&self) -> ExitPolicy {
        if self.propagate_exit {
            ExitPolicy::Propagate
        } else {
            ExitPolicy::AlwaysSuccess
        }
    }
}

/// Resolves the target process of `args`.
fn resolve_pid(args: &ExecArgs, config: &NsjoinConfig) -> anyhow::Result<TargetPid> {
    if args.pid {
        return Ok(TargetPid::parse(&args.target)?);
    }
    let state = load_state(&config.state_file)?;
    Ok(running_pid(&state, &args.target)?)
}

/// Executes the `exec` command.
///
/// Re-launches this binary with the target pid and command line in its
/// environment. The re-launched process joins the target's namespaces
/// before anything else runs.
///
/// # Errors
///
/// Returns an error if the target cannot be resolved or the process cannot
/// be launched.
pub fn execute(args: ExecArgs, config: &NsjoinConfig) -> anyhow::Result<()> {
    let pid = resolve_pid(&args, config)?;
    let request = ExecRequest {
        pid,
        exit_policy: args.exit_policy(),
        command: args.command,
    };

    let status = launch(&request)?;
    if !status.success() {
        tracing::error!(container = %args.target, %status, "exec finished unsuccessfully");
    }
    let code = CommandResult {
        code: status.code(),
        signal: status.signal(),
    }
    .shell_status();
    std::process::exit(code);
}
