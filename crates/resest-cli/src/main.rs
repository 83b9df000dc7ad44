#![doc = include_str!("../README.md")]

mod cli;
mod commands;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    // Reports go to stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut rng = commands::helpers::seeded_rng(cli.seed);

    match cli.command {
        Commands::Estimate {
            walk,
            nodes,
            observer,
        } => {
            commands::estimate::run_estimate_command(walk, nodes, observer, cli.seed, &mut rng)?;
        }
        Commands::Sweep { walk, sizes } => {
            commands::sweep::run_sweep_command(walk, sizes, cli.seed, &mut rng)?;
        }
        Commands::Table {
            table,
            confidence,
            format,
        } => {
            commands::table::run_table_command(table, confidence, format)?;
        }
    }

    Ok(())
}
