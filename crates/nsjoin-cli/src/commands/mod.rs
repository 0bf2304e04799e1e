//! CLI command definitions and dispatch.

pub mod exec;
pub mod ps;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nsjoin_common::config::NsjoinConfig;
use nsjoin_common::constants::ENV_STATE_FILE;

/// nsjoin — run commands inside the namespaces of a running container.
#[derive(Parser, Debug)]
#[command(name = "nsj", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to the state file.
    #[arg(long, global = true, env = ENV_STATE_FILE)]
    pub state_file: Option<PathBuf>,
}

impl Cli {
    /// Effective configuration after applying command-line overrides.
    ///
    /// The default data directory is only resolved when no state file was
    /// given.
    #[must_use]
    pub fn config(&self) -> NsjoinConfig {
        self.state_file
            .clone()
            .map_or_else(NsjoinConfig::default, |state_file| NsjoinConfig { state_file })
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a command inside a running container.
    Exec(exec::ExecArgs),
    /// List containers recorded in the state file.
    Ps(ps::PsArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config();
    match cli.command {
        Command::Exec(args) => exec::execute(args, &config),
        Command::Ps(args) => ps::execute(args, &config),
    }
}
