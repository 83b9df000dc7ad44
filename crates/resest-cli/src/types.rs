//! Shared types used across CLI commands and tests.

use std::collections::BTreeMap;

use serde::Serialize;

use resest_prob::{ClassScheme, ConfidenceTable, EstimatorConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Everything a run needs besides the population and the RNG.
pub(crate) struct RunContext {
    pub(crate) table: ConfidenceTable,
    pub(crate) confidence: u32,
    pub(crate) config: EstimatorConfig,
    pub(crate) artifacts: Option<std::path::PathBuf>,
}

/// Effective run parameters, echoed into JSON reports.
#[derive(Serialize)]
pub(crate) struct RunParameters {
    pub(crate) confidence: u32,
    pub(crate) table_source: String,
    pub(crate) trials: usize,
    pub(crate) degree: usize,
    pub(crate) tolerance: f64,
    pub(crate) classes: ClassScheme,
    pub(crate) near: f64,
    pub(crate) far: f64,
    pub(crate) safety_margin: usize,
    pub(crate) seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SizeStatus {
    Completed,
    Inconclusive,
}

/// Result for one population size.
#[derive(Serialize)]
pub(crate) struct SizeReport {
    pub(crate) nodes: usize,
    pub(crate) observer: usize,
    pub(crate) reference: i64,
    pub(crate) real_mean: f64,
    pub(crate) status: SizeStatus,
    pub(crate) completed_trials: usize,
    pub(crate) safety_limit: usize,
    pub(crate) aborted_after_hops: Option<usize>,
    pub(crate) average_hops: Option<f64>,
    pub(crate) average_mean: Option<f64>,
    pub(crate) histogram_error: Option<f64>,
    pub(crate) estimated: Option<BTreeMap<i64, f64>>,
    pub(crate) real: Option<BTreeMap<i64, f64>>,
}

#[derive(Serialize)]
pub(crate) struct RunReport {
    pub(crate) parameters: RunParameters,
    pub(crate) sizes: Vec<SizeReport>,
}
