//! Reduction of raw histograms into a few buckets relative to a reference
//! resource level.
//!
//! Bucket edges are `reference ± trunc(fraction · reference)`. Every bucket
//! is half-open `[lower, upper)` and is keyed by its lower edge, except the
//! lowest bucket which is keyed by `0`. Keys are therefore stable across all
//! histograms classified against the same reference.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::histogram::Histogram;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("Resource level is negative: {0}")]
    NegativeResource(i64),
    #[error("Reference resource level is negative: {0}")]
    NegativeReference(i64),
}

#[derive(Debug, Error, PartialEq)]
#[error("Invalid bucket bounds: near={near}, far={far} (need 0 <= near <= far <= 1)")]
pub struct InvalidBounds {
    pub near: f64,
    pub far: f64,
}

/// How many buckets the reduction produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassScheme {
    /// far-low, near-low, center, near-high, far-high.
    #[default]
    Five,
    /// below, center, above (using the `near` offset).
    Three,
    /// below the reference, at or above it.
    Two,
}

impl ClassScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Five => "five",
            Self::Three => "three",
            Self::Two => "two",
        }
    }
}

impl fmt::Display for ClassScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "five" | "5" => Ok(Self::Five),
            "three" | "3" => Ok(Self::Three),
            "two" | "2" => Ok(Self::Two),
            other => Err(format!(
                "Unknown class scheme: {other}. Use 'five', 'three' or 'two'."
            )),
        }
    }
}

/// Relative offsets of the bucket edges from the reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketBounds {
    /// Half-width of the center bucket (default 10%).
    pub near: f64,
    /// Offset of the far buckets (default 50%).
    pub far: f64,
}

impl Default for BucketBounds {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 0.5,
        }
    }
}

impl BucketBounds {
    pub fn new(near: f64, far: f64) -> Result<Self, InvalidBounds> {
        let bounds = Self { near, far };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), InvalidBounds> {
        let ok = self.near.is_finite()
            && self.far.is_finite()
            && 0.0 <= self.near
            && self.near <= self.far
            && self.far <= 1.0;
        if ok {
            Ok(())
        } else {
            Err(InvalidBounds {
                near: self.near,
                far: self.far,
            })
        }
    }
}

/// Buckets for one reference value: interior edges plus one key per bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets {
    edges: Vec<i64>,
    keys: Vec<i64>,
}

impl Buckets {
    /// Key of the bucket containing `level`.
    pub fn key_of(&self, level: i64) -> Result<i64, ClassifyError> {
        if level < 0 {
            return Err(ClassifyError::NegativeResource(level));
        }
        let idx = self.edges.partition_point(|&edge| edge <= level);
        Ok(self.keys[idx])
    }

    pub fn keys(&self) -> &[i64] {
        &self.keys
    }

    pub fn edges(&self) -> &[i64] {
        &self.edges
    }
}

/// Classifier configured with a scheme and bucket bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Classifier {
    pub scheme: ClassScheme,
    pub bounds: BucketBounds,
}

impl Classifier {
    pub fn new(scheme: ClassScheme, bounds: BucketBounds) -> Self {
        Self { scheme, bounds }
    }

    /// Bucket layout around `reference`.
    pub fn buckets(&self, reference: i64) -> Result<Buckets, ClassifyError> {
        if reference < 0 {
            return Err(ClassifyError::NegativeReference(reference));
        }
        let near = offset(reference, self.bounds.near);
        let far = offset(reference, self.bounds.far);
        // Offsets are at most `reference`, so only the upper edges can overflow.
        let edges = match self.scheme {
            ClassScheme::Five => vec![
                reference - far,
                reference - near,
                reference.saturating_add(near),
                reference.saturating_add(far),
            ],
            ClassScheme::Three => vec![reference - near, reference.saturating_add(near)],
            ClassScheme::Two => vec![reference],
        };
        let keys = std::iter::once(0).chain(edges.iter().copied()).collect();
        Ok(Buckets { edges, keys })
    }

    /// Sum the counts of `histogram` per bucket around `reference`.
    ///
    /// Only buckets that receive at least one key appear in the output.
    pub fn classify(&self, histogram: &Histogram, reference: i64) -> Result<Histogram, ClassifyError> {
        let buckets = self.buckets(reference)?;
        let mut reduced = Histogram::new();
        for (&level, &count) in histogram {
            *reduced.entry(buckets.key_of(level)?).or_insert(0) += count;
        }
        Ok(reduced)
    }
}

/// Five-class reduction with the default 10% / 50% bounds.
pub fn classify(histogram: &Histogram, reference: i64) -> Result<Histogram, ClassifyError> {
    Classifier::default().classify(histogram, reference)
}

fn offset(reference: i64, fraction: f64) -> i64 {
    // Truncation toward zero; reference is non-negative here.
    (reference as f64 * fraction) as i64
}
