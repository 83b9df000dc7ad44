// Command handler for: Estimate
//
// Loads a population prefix, runs one multi-trial estimation from a single
// observer, scores the estimate against ground truth, and reports it.

use rand::Rng;
use tracing::{info, warn};

use resest_prob::{Estimator, Population, RunOutcome};

use super::helpers::{
    artifact_dir, parse_output_format, run_context_from_args, run_parameters, write_json_artifact,
};
use crate::cli::WalkArgs;
use crate::types::{OutputFormat, RunContext, RunReport, SizeReport, SizeStatus};

/// Run one estimation over `population` and write its artifacts.
pub(crate) fn run_size<R: Rng + ?Sized>(
    ctx: &RunContext,
    population: &Population,
    observer: Option<usize>,
    rng: &mut R,
) -> miette::Result<SizeReport> {
    let estimator =
        Estimator::new(population, &ctx.table, ctx.config).map_err(|e| miette::miette!("{e}"))?;
    let observer = observer.unwrap_or_else(|| estimator.pick_observer(rng));
    let reference = population.level(observer).ok_or_else(|| {
        miette::miette!(
            "Observer {observer} is outside the population of {} nodes",
            population.len()
        )
    })?;

    let outcome = estimator
        .run(rng, observer)
        .map_err(|e| miette::miette!("Estimation over {} nodes failed: {e}", population.len()))?;

    let nodes = population.len();
    let dir = ctx
        .artifacts
        .as_deref()
        .map(|root| artifact_dir(root, ctx.confidence, ctx.config.tolerance, nodes));

    let trials = match &outcome {
        RunOutcome::Completed(estimate) => &estimate.trials,
        RunOutcome::Aborted(run) => &run.completed,
    };
    if let Some(dir) = &dir {
        for (i, trial) in trials.iter().enumerate() {
            write_json_artifact(&dir.join(format!("obtained{i}.json")), &trial.raw)?;
        }
    }

    let mut report = SizeReport {
        nodes,
        observer,
        reference,
        real_mean: population.mean(),
        status: SizeStatus::Inconclusive,
        completed_trials: trials.len(),
        safety_limit: estimator.safety_limit(),
        aborted_after_hops: None,
        average_hops: None,
        average_mean: None,
        histogram_error: None,
        estimated: None,
        real: None,
    };

    match outcome {
        RunOutcome::Completed(estimate) => {
            if let Some(dir) = &dir {
                write_json_artifact(&dir.join("real.json"), &population.histogram())?;
            }
            let real = estimate
                .ground_truth(population)
                .map_err(|e| miette::miette!("{e}"))?;
            let error = estimate
                .score_against(population)
                .map_err(|e| miette::miette!("{e}"))?;
            info!(nodes, error, "estimation completed");
            report.status = SizeStatus::Completed;
            report.average_hops = Some(estimate.average_hops);
            report.average_mean = Some(estimate.average_mean);
            report.histogram_error = Some(error);
            report.estimated = Some(estimate.distribution);
            report.real = Some(real);
        }
        RunOutcome::Aborted(run) => {
            warn!(nodes, hops = run.hops, "run inconclusive");
            report.aborted_after_hops = Some(run.hops);
        }
    }
    Ok(report)
}

pub(crate) fn render_size_text(report: &SizeReport) -> String {
    let n = report.nodes;
    match report.status {
        SizeStatus::Completed => {
            let mut out = format!(
                "{n} nodes – Average number of hops: {:.1}, avg means: {:.6}\n",
                report.average_hops.unwrap_or_default(),
                report.average_mean.unwrap_or_default()
            );
            out.push_str(&format!("{n} nodes – Real Mean: {:.6}\n", report.real_mean));
            out.push_str(&format!(
                "{n} nodes – Histogram error: {:.6}\n",
                report.histogram_error.unwrap_or_default()
            ));
            out
        }
        SizeStatus::Inconclusive => format!(
            "{n} nodes – INCONCLUSIVE: hop safety limit ({}) reached after {} completed trials\n",
            report.safety_limit, report.completed_trials
        ),
    }
}

pub(crate) fn print_report(report: &RunReport, format: OutputFormat) -> miette::Result<()> {
    match format {
        OutputFormat::Text => {
            for size in &report.sizes {
                print!("{}", render_size_text(size));
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(report).map_err(|e| miette::miette!("{e}"))?
            );
        }
    }
    Ok(())
}

/// Entry point for `resest estimate`.
pub(crate) fn run_estimate_command<R: Rng + ?Sized>(
    walk: WalkArgs,
    nodes: usize,
    observer: Option<usize>,
    seed: Option<u64>,
    rng: &mut R,
) -> miette::Result<()> {
    let format = parse_output_format(&walk.format)?;
    let ctx = run_context_from_args(&walk)?;
    let population = Population::load(&walk.population, Some(nodes))
        .map_err(|e| miette::miette!("{}: {e}", walk.population.display()))?;
    if population.len() < nodes {
        warn!(
            requested = nodes,
            available = population.len(),
            "population file shorter than requested size"
        );
    }

    let size = run_size(&ctx, &population, observer, rng)?;
    let report = RunReport {
        parameters: run_parameters(&ctx, &walk, seed),
        sizes: vec![size],
    };
    print_report(&report, format)
}
