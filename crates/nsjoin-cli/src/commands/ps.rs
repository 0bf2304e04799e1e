//! `nsj ps` — List containers recorded in the state file.

use clap::Args;
use nsjoin_common::config::NsjoinConfig;
use nsjoin_common::types::ContainerState;
use nsjoin_runtime::state::load_state;

/// Arguments for the `ps` command.
#[derive(Args, Debug)]
pub struct PsArgs {
    /// Show all containers (including stopped).
    #[arg(short, long)]
    pub all: bool,
}

/// Executes the `ps` command.
///
/// # Errors
///
/// Returns an error if the state file cannot be loaded.
#[allow(clippy::print_stdout)]
pub fn execute(args: PsArgs, config: &NsjoinConfig) -> anyhow::Result<()> {
    let state = load_state(&config.state_file)?;

    let filtered: Vec<_> = state
        .containers
        .iter()
        .filter(|c| args.all || c.state == ContainerState::Running)
        .collect();

    if filtered.is_empty() {
        println!("No containers found.");
        return Ok(());
    }

    println!(
        "{:<20} {:<15} {:<10} {:<8} {:<30}",
        "CONTAINER ID", "NAME", "STATE", "PID", "COMMAND"
    );
    for c in &filtered {
        println!(
            "{:<20} {:<15} {:<10} {:<8} {:<30}",
            c.id,
            c.name,
            c.state,
            c.pid.map_or_else(|| "-".to_string(), |p| p.to_string()),
            c.command
        );
    }

    Ok(())
}
