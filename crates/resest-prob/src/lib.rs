//! Estimation of a population's resource-level distribution by a single
//! observer's no-repeat random walk with confidence-interval stopping.

pub mod classify;
pub mod confidence;
pub mod critical;
pub mod histogram;
pub mod population;
pub mod sampler;
pub mod score;
pub mod trial;

pub use classify::{classify, BucketBounds, ClassScheme, ClassifyError, Classifier};
pub use confidence::{evaluate, ConfidenceResult, MIN_SAMPLES};
pub use critical::{ConfidenceLevel, ConfidenceTable, CriticalValueError};
pub use histogram::{normalize, Distribution, Histogram, NormalizeError, RunningHistogram};
pub use population::{Population, PopulationError};
pub use sampler::{next_hop, SamplerError, VisitedSet};
pub use score::total_variation;
pub use trial::{
    AbortedRun, CompletedTrial, Estimate, EstimateError, Estimator, EstimatorConfig, RunOutcome,
    TrialOutcome,
};
