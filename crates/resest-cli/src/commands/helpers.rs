// Shared helper functions used across CLI command handlers.
//
// These parse CLI string arguments into typed values, assemble the run
// context, and write report and histogram artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use miette::IntoDiagnostic;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use resest_prob::{
    BucketBounds, ClassScheme, Classifier, ConfidenceLevel, ConfidenceTable, EstimatorConfig,
};

use crate::cli::WalkArgs;
use crate::types::{OutputFormat, RunContext, RunParameters};

pub(crate) fn parse_output_format(raw: &str) -> miette::Result<OutputFormat> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => miette::bail!("Unknown output format: {other}. Use 'text' or 'json'."),
    }
}

pub(crate) fn parse_class_scheme(raw: &str) -> miette::Result<ClassScheme> {
    raw.parse::<ClassScheme>().map_err(|e| miette::miette!("{e}"))
}

/// One generator for the whole process, seeded once.
pub(crate) fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Load a table file, or fall back to the builtin table for `confidence`.
pub(crate) fn load_table(path: Option<&Path>, confidence: u32) -> miette::Result<ConfidenceTable> {
    match path {
        Some(path) => ConfidenceTable::load(path)
            .map_err(|e| miette::miette!("{}: {e}", path.display())),
        None => {
            let level = ConfidenceLevel::from_percent(confidence).into_diagnostic()?;
            Ok(ConfidenceTable::builtin(level))
        }
    }
}

pub(crate) fn run_context_from_args(args: &WalkArgs) -> miette::Result<RunContext> {
    let bounds = BucketBounds::new(args.near, args.far).into_diagnostic()?;
    let config = EstimatorConfig {
        trials: args.trials,
        degree: args.degree,
        tolerance: args.tolerance,
        classifier: Classifier::new(parse_class_scheme(&args.classes)?, bounds),
        safety_margin: args.safety_margin,
    };
    config.validate().into_diagnostic()?;
    Ok(RunContext {
        table: load_table(args.table.as_deref(), args.confidence)?,
        confidence: args.confidence,
        config,
        artifacts: args.artifacts.clone(),
    })
}

pub(crate) fn run_parameters(ctx: &RunContext, args: &WalkArgs, seed: Option<u64>) -> RunParameters {
    RunParameters {
        confidence: ctx.confidence,
        table_source: match &args.table {
            Some(path) => path.display().to_string(),
            None => "builtin".to_string(),
        },
        trials: ctx.config.trials,
        degree: ctx.config.degree,
        tolerance: ctx.config.tolerance,
        classes: ctx.config.classifier.scheme,
        near: ctx.config.classifier.bounds.near,
        far: ctx.config.classifier.bounds.far,
        safety_margin: ctx.config.safety_margin,
        seed,
    }
}

/// `<root>/<confidence>confLevel/<tolerance>maxErr/<nodes>nodes`
pub(crate) fn artifact_dir(root: &Path, confidence: u32, tolerance: f64, nodes: usize) -> PathBuf {
    root.join(format!("{confidence}confLevel"))
        .join(format!("{tolerance}maxErr"))
        .join(format!("{nodes}nodes"))
}

pub(crate) fn write_json_artifact<T: Serialize>(path: &Path, value: &T) -> miette::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    fs::write(path, serde_json::to_string_pretty(value).into_diagnostic()?).into_diagnostic()?;
    Ok(())
}
