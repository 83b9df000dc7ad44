//! Multi-trial estimation driven by one observer.
//!
//! Each trial is a walk in state `Walking` that ends either `Converged`
//! (the stopping rule fired) or `Aborted` (the hop safety limit was hit or
//! no unvisited node remained). A single aborted trial abandons the run.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classify::{ClassifyError, Classifier, InvalidBounds};
use crate::confidence::evaluate;
use crate::critical::{ConfidenceTable, CriticalValueError};
use crate::histogram::{normalize, Distribution, Histogram, NormalizeError, RunningHistogram};
use crate::population::Population;
use crate::sampler::{next_hop, SamplerError, VisitedSet};
use crate::score::total_variation;

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("Invalid estimator configuration: {0}")]
    Config(String),
    #[error("Observer {observer} is outside the population of {population} nodes")]
    ObserverOutOfRange { observer: usize, population: usize },
    #[error("Sampler error: {0}")]
    Sampler(#[from] SamplerError),
    #[error("Critical value error: {0}")]
    CriticalValue(#[from] CriticalValueError),
    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),
    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),
}

impl From<InvalidBounds> for EstimateError {
    fn from(err: InvalidBounds) -> Self {
        EstimateError::Config(err.to_string())
    }
}

/// Run parameters injected into the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimatorConfig {
    /// Independent walks per run.
    pub trials: usize,
    /// Partial view size per hop.
    pub degree: usize,
    /// Maximum accepted margin-of-error ratio.
    pub tolerance: f64,
    /// Bucket scheme and bounds used for the final distribution.
    pub classifier: Classifier,
    /// The hop safety limit is `population − safety_margin`.
    pub safety_margin: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            trials: 10,
            degree: 7,
            tolerance: 0.15,
            classifier: Classifier::default(),
            safety_margin: 3,
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), EstimateError> {
        if self.trials == 0 {
            return Err(EstimateError::Config("trials must be positive".into()));
        }
        if self.degree == 0 {
            return Err(EstimateError::Config("degree must be positive".into()));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(EstimateError::Config(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        self.classifier.bounds.validate()?;
        Ok(())
    }

    /// Hop count at which a trial is abandoned for a population of `len`.
    pub fn safety_limit(&self, len: usize) -> usize {
        len.saturating_sub(self.safety_margin)
    }
}

/// A walk that reached the stopping rule.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedTrial {
    /// Hops counted when the stopping rule fired (samples − 1).
    pub hops: usize,
    /// Sample mean at convergence.
    pub mean: f64,
    /// The walk's raw value → count histogram.
    pub raw: Histogram,
    /// `raw` reduced around the observer's level.
    pub classified: Histogram,
}

/// Terminal state of one trial.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrialOutcome {
    Converged(CompletedTrial),
    Aborted { hops: usize, mean: f64 },
}

/// Averaged result of a run in which every trial converged.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub observer: usize,
    /// The observer's own resource level; bucket anchor.
    pub reference: i64,
    pub classifier: Classifier,
    pub trials: Vec<CompletedTrial>,
    pub average_hops: f64,
    pub average_mean: f64,
    /// Normalized per-bucket average of the trials' classified counts.
    pub distribution: Distribution,
}

impl Estimate {
    /// Normalized classification of the whole population around the same
    /// reference and with the same scheme.
    pub fn ground_truth(&self, population: &Population) -> Result<Distribution, EstimateError> {
        let reduced = self
            .classifier
            .classify(&population.histogram(), self.reference)?;
        Ok(normalize(&reduced)?)
    }

    /// Total-variation distance between the ground truth and the estimate.
    pub fn score_against(&self, population: &Population) -> Result<f64, EstimateError> {
        Ok(total_variation(&self.ground_truth(population)?, &self.distribution))
    }
}

/// A run abandoned because one trial hit the safety limit.
#[derive(Debug, Clone, Serialize)]
pub struct AbortedRun {
    pub observer: usize,
    /// Trials that converged before the abort.
    pub completed: Vec<CompletedTrial>,
    /// Hops taken by the aborted trial.
    pub hops: usize,
    pub safety_limit: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed(Estimate),
    Aborted(AbortedRun),
}

impl RunOutcome {
    pub fn estimate(&self) -> Option<&Estimate> {
        match self {
            RunOutcome::Completed(estimate) => Some(estimate),
            RunOutcome::Aborted(_) => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RunOutcome::Aborted(_))
    }
}

/// Runs walks over a borrowed population and critical-value table.
#[derive(Debug, Clone, Copy)]
pub struct Estimator<'a> {
    population: &'a Population,
    table: &'a ConfidenceTable,
    config: EstimatorConfig,
}

impl<'a> Estimator<'a> {
    pub fn new(
        population: &'a Population,
        table: &'a ConfidenceTable,
        config: EstimatorConfig,
    ) -> Result<Self, EstimateError> {
        config.validate()?;
        Ok(Self {
            population,
            table,
            config,
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn safety_limit(&self) -> usize {
        self.config.safety_limit(self.population.len())
    }

    /// Pick an observer uniformly at random.
    pub fn pick_observer<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.population.len())
    }

    fn reference(&self, observer: usize) -> Result<i64, EstimateError> {
        self.population
            .level(observer)
            .ok_or(EstimateError::ObserverOutOfRange {
                observer,
                population: self.population.len(),
            })
    }

    /// Walk from `observer` until the stopping rule fires or the walk aborts.
    pub fn run_trial<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        observer: usize,
    ) -> Result<TrialOutcome, EstimateError> {
        let reference = self.reference(observer)?;
        let limit = self.safety_limit();
        let levels = self.population.levels();

        let mut visited = VisitedSet::new(observer);
        let mut histogram = RunningHistogram::new();
        let mut hops = 0usize;

        loop {
            let node = match next_hop(rng, levels.len(), &mut visited, self.config.degree) {
                Ok(node) => node,
                Err(SamplerError::Exhausted { .. }) => {
                    return Ok(TrialOutcome::Aborted {
                        hops,
                        mean: histogram.mean(),
                    });
                }
                Err(e) => return Err(e.into()),
            };
            histogram.record(levels[node]);

            let result = evaluate(&histogram, self.config.tolerance, self.table)?;
            if result.within_bounds {
                let classified = self
                    .config
                    .classifier
                    .classify(histogram.counts(), reference)?;
                return Ok(TrialOutcome::Converged(CompletedTrial {
                    hops,
                    mean: result.mean,
                    raw: histogram.into_counts(),
                    classified,
                }));
            }

            hops += 1;
            if hops >= limit {
                return Ok(TrialOutcome::Aborted {
                    hops,
                    mean: result.mean,
                });
            }
        }
    }

    /// Run the configured number of trials from `observer` and average them.
    ///
    /// Returns [`RunOutcome::Aborted`] as soon as one trial aborts.
    pub fn run<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        observer: usize,
    ) -> Result<RunOutcome, EstimateError> {
        let reference = self.reference(observer)?;
        info!(
            nodes = self.population.len(),
            observer,
            reference,
            trials = self.config.trials,
            "starting estimation run"
        );

        let mut completed = Vec::with_capacity(self.config.trials);
        for trial in 0..self.config.trials {
            match self.run_trial(rng, observer)? {
                TrialOutcome::Converged(outcome) => {
                    debug!(trial, hops = outcome.hops, mean = outcome.mean, "trial converged");
                    completed.push(outcome);
                }
                TrialOutcome::Aborted { hops, .. } => {
                    warn!(
                        trial,
                        hops,
                        completed = completed.len(),
                        "hop safety limit reached; abandoning run"
                    );
                    return Ok(RunOutcome::Aborted(AbortedRun {
                        observer,
                        completed,
                        hops,
                        safety_limit: self.safety_limit(),
                    }));
                }
            }
        }

        Ok(RunOutcome::Completed(aggregate(
            observer,
            reference,
            self.config.classifier,
            completed,
        )?))
    }
}

fn aggregate(
    observer: usize,
    reference: i64,
    classifier: Classifier,
    trials: Vec<CompletedTrial>,
) -> Result<Estimate, EstimateError> {
    let count = trials.len() as f64;
    let mut summed = Histogram::new();
    for trial in &trials {
        for (&key, &value) in &trial.classified {
            *summed.entry(key).or_insert(0) += value;
        }
    }
    let averaged: Distribution = summed
        .into_iter()
        .map(|(key, total)| (key, total as f64 / count))
        .collect();
    let distribution = normalize(&averaged)?;

    let average_hops = trials.iter().map(|t| t.hops as f64).sum::<f64>() / count;
    let average_mean = trials.iter().map(|t| t.mean).sum::<f64>() / count;

    Ok(Estimate {
        observer,
        reference,
        classifier,
        trials,
        average_hops,
        average_mean,
        distribution,
    })
}
