use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Raw value → count histogram. Keys are resource levels or bucket keys.
pub type Histogram = BTreeMap<i64, u64>;

/// Probability mass per key, produced by [`normalize`].
pub type Distribution = BTreeMap<i64, f64>;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("Cannot normalize an empty histogram (total mass is zero)")]
    DivideByZero,
}

/// Histogram accumulated by a single walk.
///
/// The sample total is tracked alongside the counts so that the invariant
/// `samples == Σ counts` holds without re-summing on every evaluation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunningHistogram {
    counts: Histogram,
    samples: u64,
}

impl RunningHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sampled resource level.
    pub fn record(&mut self, level: i64) {
        *self.counts.entry(level).or_insert(0) += 1;
        self.samples += 1;
    }

    /// Number of samples recorded so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    pub fn counts(&self) -> &Histogram {
        &self.counts
    }

    /// Count-weighted mean of the recorded levels, `0.0` when empty.
    pub fn mean(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .counts
            .iter()
            .map(|(&level, &count)| level as f64 * count as f64)
            .sum();
        sum / self.samples as f64
    }

    /// Standard deviation over the multiset implied by the counts.
    ///
    /// Divides by `n` (not `n - 1`), matching the margin-of-error rule used
    /// by [`crate::confidence::evaluate`].
    pub fn std_dev(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self
            .counts
            .iter()
            .map(|(&level, &count)| {
                let d = level as f64 - mean;
                d * d * count as f64
            })
            .sum();
        (sum_sq / self.samples as f64).sqrt()
    }

    pub fn into_counts(self) -> Histogram {
        self.counts
    }
}

impl FromIterator<i64> for RunningHistogram {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for level in iter {
            histogram.record(level);
        }
        histogram
    }
}

impl From<Histogram> for RunningHistogram {
    fn from(counts: Histogram) -> Self {
        let samples = counts.values().sum();
        Self { counts, samples }
    }
}

/// Bucket masses that can be normalized: integer counts or averaged counts.
pub trait Mass: Copy {
    fn as_f64(self) -> f64;
}

impl Mass for u64 {
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Mass for f64 {
    fn as_f64(self) -> f64 {
        self
    }
}

/// Total mass of a histogram.
pub fn total<V: Mass>(histogram: &BTreeMap<i64, V>) -> f64 {
    histogram.values().map(|v| v.as_f64()).sum()
}

/// Divide every bucket by the histogram's total mass.
///
/// # Errors
/// [`NormalizeError::DivideByZero`] when the total mass is zero.
pub fn normalize<V: Mass>(histogram: &BTreeMap<i64, V>) -> Result<Distribution, NormalizeError> {
    let total = total(histogram);
    if total == 0.0 {
        return Err(NormalizeError::DivideByZero);
    }
    Ok(histogram
        .iter()
        .map(|(&key, &value)| (key, value.as_f64() / total))
        .collect())
}
