//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Estimate a population's resource-level distribution from a single observer's \
    random walk, stopping once the margin of error is within tolerance.\n\n\
    Typical use:\n  \
    1. resest estimate resources.txt --nodes 1000\n  \
    2. resest sweep resources.txt --sizes 1000,100000,1000000 --artifacts logs\n  \
    3. resest table --confidence 95\n\n\
    Logging is controlled by RUST_LOG (default: info).";

#[derive(Parser)]
#[command(name = "resest")]
#[command(about = "Random-walk resource-level estimator")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    /// Seed for the run's random source (OS entropy when omitted)
    #[arg(long, global = true)]
    pub(crate) seed: Option<u64>,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Parameters shared by every command that runs walks.
#[derive(Args, Clone, Debug)]
pub(crate) struct WalkArgs {
    /// Population file: one integer resource level per line
    pub(crate) population: PathBuf,

    /// Critical-value table file (31 lines); builtin table when omitted
    #[arg(long)]
    pub(crate) table: Option<PathBuf>,

    /// Two-sided confidence level in percent: 90 | 95 | 99
    #[arg(long, default_value_t = 90)]
    pub(crate) confidence: u32,

    /// Independent walks per population size
    #[arg(long, default_value_t = 10)]
    pub(crate) trials: usize,

    /// Partial view size per hop
    #[arg(long, default_value_t = 7)]
    pub(crate) degree: usize,

    /// Maximum margin-of-error ratio accepted as converged
    #[arg(long, default_value_t = 0.15)]
    pub(crate) tolerance: f64,

    /// Relative half-width of the center bucket
    #[arg(long, default_value_t = 0.1)]
    pub(crate) near: f64,

    /// Relative offset of the far buckets
    #[arg(long, default_value_t = 0.5)]
    pub(crate) far: f64,

    /// Bucket scheme: five | three | two
    #[arg(long, default_value = "five")]
    pub(crate) classes: String,

    /// Hop safety limit is population size minus this margin
    #[arg(long, default_value_t = 3)]
    pub(crate) safety_margin: usize,

    /// Directory for per-trial and ground-truth histogram artifacts (JSON)
    #[arg(long)]
    pub(crate) artifacts: Option<PathBuf>,

    /// Output format: text | json
    #[arg(long, default_value = "text")]
    pub(crate) format: String,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run one estimation over the first N nodes of a population file
    Estimate {
        #[command(flatten)]
        walk: WalkArgs,

        /// Number of nodes to read from the population file
        #[arg(long, default_value_t = 1000)]
        nodes: usize,

        /// Observer node id (random when omitted)
        #[arg(long)]
        observer: Option<usize>,
    },

    /// Run estimations for a list of population sizes
    Sweep {
        #[command(flatten)]
        walk: WalkArgs,

        /// Comma-separated population sizes
        #[arg(long, value_delimiter = ',', default_value = "1000,1000000")]
        sizes: Vec<usize>,
    },

    /// Print the effective critical-value table
    Table {
        /// Critical-value table file; builtin table when omitted
        #[arg(long)]
        table: Option<PathBuf>,

        /// Two-sided confidence level in percent: 90 | 95 | 99
        #[arg(long, default_value_t = 90)]
        confidence: u32,

        /// Output format: text | json
        #[arg(long, default_value = "text")]
        format: String,
    },
}
