//! # nsj — nsjoin CLI
//!
//! Runs commands inside the namespaces of a running container.
//! The same binary is re-launched by `nsj exec` to perform the join.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

mod commands;

use clap::Parser;
use nsjoin_common::config::ActivationSignals;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Nothing below may start a thread before this returns.
    nsjoin_core::hook::pre_main(&ActivationSignals::from_env())?;

    let cli = Cli::parse();
    commands::execute(cli)
}
