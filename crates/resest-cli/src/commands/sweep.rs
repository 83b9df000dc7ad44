// Command handler for: Sweep
//
// Runs the estimator for each requested population size, reusing one
// random source for the whole sweep. An inconclusive size does not stop
// the sweep.

use rand::Rng;
use tracing::{info, warn};

use resest_prob::Population;

use super::estimate::{print_report, run_size};
use super::helpers::{parse_output_format, run_context_from_args, run_parameters};
use crate::cli::WalkArgs;
use crate::types::RunReport;

/// Entry point for `resest sweep`.
pub(crate) fn run_sweep_command<R: Rng + ?Sized>(
    walk: WalkArgs,
    sizes: Vec<usize>,
    seed: Option<u64>,
    rng: &mut R,
) -> miette::Result<()> {
    let format = parse_output_format(&walk.format)?;
    if sizes.is_empty() || sizes.contains(&0) {
        miette::bail!("Sweep sizes must be a non-empty list of positive node counts");
    }
    let ctx = run_context_from_args(&walk)?;

    let largest = sizes.iter().copied().max().unwrap_or_default();
    let full = Population::load(&walk.population, Some(largest))
        .map_err(|e| miette::miette!("{}: {e}", walk.population.display()))?;

    let mut reports = Vec::with_capacity(sizes.len());
    for &nodes in &sizes {
        if nodes > full.len() {
            warn!(
                requested = nodes,
                available = full.len(),
                "population file shorter than requested size"
            );
        }
        let population = full.prefix(nodes).map_err(|e| miette::miette!("{e}"))?;
        info!(nodes = population.len(), "sweep step");
        reports.push(run_size(&ctx, &population, None, rng)?);
    }

    let report = RunReport {
        parameters: run_parameters(&ctx, &walk, seed),
        sizes: reports,
    };
    print_report(&report, format)
}
