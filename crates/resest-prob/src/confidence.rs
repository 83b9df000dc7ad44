use serde::Serialize;

use crate::critical::{ConfidenceTable, CriticalValueError};
use crate::histogram::RunningHistogram;

/// Samples at or below this count are never certified as converged.
pub const MIN_SAMPLES: u64 = 10;

/// Outcome of one stopping-rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceResult {
    /// Count-weighted sample mean.
    pub mean: f64,
    /// Whether the relative margin of error is within tolerance.
    pub within_bounds: bool,
    /// Margin of error divided by the mean, when it was computed.
    pub margin_ratio: Option<f64>,
}

/// Decide whether the walk behind `histogram` has converged.
///
/// Below [`MIN_SAMPLES`] + 1 samples the result is never within bounds.
/// Otherwise the margin of error is `critical_value(n) * std_dev / sqrt(n)`
/// and the walk converges when `margin / mean <= tolerance`; equality counts
/// as converged. A zero mean yields a non-finite ratio and never converges.
pub fn evaluate(
    histogram: &RunningHistogram,
    tolerance: f64,
    table: &ConfidenceTable,
) -> Result<ConfidenceResult, CriticalValueError> {
    let n = histogram.samples();
    let mean = histogram.mean();

    if n <= MIN_SAMPLES {
        return Ok(ConfidenceResult {
            mean,
            within_bounds: false,
            margin_ratio: None,
        });
    }

    let std_dev = histogram.std_dev();
    let margin = table.critical_value(n)? * std_dev / (n as f64).sqrt();
    let ratio = margin / mean;

    Ok(ConfidenceResult {
        mean,
        within_bounds: ratio <= tolerance,
        margin_ratio: Some(ratio),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critical::ConfidenceLevel;

    fn table() -> ConfidenceTable {
        ConfidenceTable::builtin(ConfidenceLevel::P90)
    }

    #[test]
    fn small_samples_never_converge() {
        // Zero variance, but only ten samples.
        let h: RunningHistogram = std::iter::repeat(10).take(10).collect();
        let result = evaluate(&h, 0.15, &table()).unwrap();
        assert!(!result.within_bounds);
        assert_eq!(result.mean, 10.0);
        assert_eq!(result.margin_ratio, None);
    }

    #[test]
    fn constant_sample_converges_at_eleven() {
        let h: RunningHistogram = std::iter::repeat(10).take(11).collect();
        let result = evaluate(&h, 0.15, &table()).unwrap();
        assert!(result.within_bounds);
        assert_eq!(result.mean, 10.0);
        assert_eq!(result.margin_ratio, Some(0.0));
    }

    #[test]
    fn outlier_pushes_margin_out_of_bounds() {
        let h: RunningHistogram = std::iter::repeat(10).take(10).chain([100]).collect();
        let result = evaluate(&h, 0.15, &table()).unwrap();
        assert!(!result.within_bounds);
        assert!((result.mean - 200.0 / 11.0).abs() < 1e-12);
        let ratio = result.margin_ratio.unwrap();
        assert!(ratio > 0.7 && ratio < 0.8, "ratio={ratio}");
    }

    #[test]
    fn ratio_equal_to_tolerance_converges() {
        let h: RunningHistogram = [8, 12].iter().cycle().take(16).copied().collect();
        let ratio = evaluate(&h, 1.0, &table()).unwrap().margin_ratio.unwrap();
        let at_boundary = evaluate(&h, ratio, &table()).unwrap();
        assert!(at_boundary.within_bounds);
        let just_below = evaluate(&h, ratio - 1e-9, &table()).unwrap();
        assert!(!just_below.within_bounds);
    }

    #[test]
    fn margin_uses_t_row_then_z_row() {
        // mean 10, std 2: ratio = c * 2 / sqrt(n) / 10
        let h: RunningHistogram = [8, 12].iter().cycle().take(20).copied().collect();
        let t = table();
        let ratio = evaluate(&h, 1.0, &t).unwrap().margin_ratio.unwrap();
        let expected = t.critical_value(20).unwrap() * 2.0 / 20f64.sqrt() / 10.0;
        assert!((ratio - expected).abs() < 1e-12);

        let h: RunningHistogram = [8, 12].iter().cycle().take(64).copied().collect();
        let ratio = evaluate(&h, 1.0, &t).unwrap().margin_ratio.unwrap();
        let expected = t.large_sample() * 2.0 / 8.0 / 10.0;
        assert!((ratio - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_mean_never_converges() {
        let h: RunningHistogram = std::iter::repeat(0).take(20).collect();
        assert!(!evaluate(&h, 0.15, &table()).unwrap().within_bounds);
    }
}
