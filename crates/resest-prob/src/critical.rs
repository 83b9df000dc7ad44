//! Critical values for margin-of-error computation.
//!
//! Rows 1..=30 hold two-sided Student t critical values indexed by sample
//! size; row 31 holds the normal (z) value used for every larger sample.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Number of rows in a critical-value table (30 t rows plus the z row).
pub const TABLE_ROWS: usize = 31;

/// Largest sample size that still uses a t row.
pub const MAX_T_ROW: u64 = 30;

#[derive(Debug, Error)]
pub enum CriticalValueError {
    #[error("Critical value requested for sample size {0}; sample size must be positive")]
    InvalidSampleSize(u64),
    #[error("Critical-value table has {found} rows, expected {expected}")]
    WrongRowCount { expected: usize, found: usize },
    #[error("Line {line}: `{text}` is not a positive critical value")]
    InvalidValue { line: usize, text: String },
    #[error("Failed to read critical-value table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported confidence level {0}%; use 90, 95 or 99")]
    UnsupportedLevel(u32),
}

/// Two-sided confidence levels with a builtin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConfidenceLevel {
    #[default]
    P90,
    P95,
    P99,
}

impl ConfidenceLevel {
    pub fn from_percent(percent: u32) -> Result<Self, CriticalValueError> {
        match percent {
            90 => Ok(Self::P90),
            95 => Ok(Self::P95),
            99 => Ok(Self::P99),
            other => Err(CriticalValueError::UnsupportedLevel(other)),
        }
    }

    pub fn percent(self) -> u32 {
        match self {
            Self::P90 => 90,
            Self::P95 => 95,
            Self::P99 => 99,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = CriticalValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches('%');
        let percent = digits
            .parse::<u32>()
            .map_err(|_| CriticalValueError::UnsupportedLevel(0))?;
        Self::from_percent(percent)
    }
}

const T_90: [f64; TABLE_ROWS] = [
    6.314, 2.920, 2.353, 2.132, 2.015, 1.943, 1.895, 1.860, 1.833, 1.812, 1.796, 1.782, 1.771,
    1.761, 1.753, 1.746, 1.740, 1.734, 1.729, 1.725, 1.721, 1.717, 1.714, 1.711, 1.708, 1.706,
    1.703, 1.701, 1.699, 1.697, 1.645,
];

const T_95: [f64; TABLE_ROWS] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045, 2.042, 1.960,
];

const T_99: [f64; TABLE_ROWS] = [
    63.657, 9.925, 5.841, 4.604, 4.032, 3.707, 3.499, 3.355, 3.250, 3.169, 3.106, 3.055, 3.012,
    2.977, 2.947, 2.921, 2.898, 2.878, 2.861, 2.845, 2.831, 2.819, 2.807, 2.797, 2.787, 2.779,
    2.771, 2.763, 2.756, 2.750, 2.576,
];

/// Immutable sample-size → critical-value lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceTable {
    rows: [f64; TABLE_ROWS],
}

impl ConfidenceTable {
    /// Builtin table for a standard confidence level.
    pub fn builtin(level: ConfidenceLevel) -> Self {
        let rows = match level {
            ConfidenceLevel::P90 => T_90,
            ConfidenceLevel::P95 => T_95,
            ConfidenceLevel::P99 => T_99,
        };
        Self { rows }
    }

    /// Parse a table with one value per line.
    ///
    /// The first [`TABLE_ROWS`] lines are used; anything after them is
    /// ignored. Every used line must hold a finite positive float.
    pub fn parse(text: &str) -> Result<Self, CriticalValueError> {
        let mut rows = [0.0; TABLE_ROWS];
        let mut found = 0;
        for (idx, line) in text.lines().take(TABLE_ROWS).enumerate() {
            let trimmed = line.trim();
            let value = trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or_else(|| CriticalValueError::InvalidValue {
                    line: idx + 1,
                    text: trimmed.to_string(),
                })?;
            rows[idx] = value;
            found += 1;
        }
        if found < TABLE_ROWS {
            return Err(CriticalValueError::WrongRowCount {
                expected: TABLE_ROWS,
                found,
            });
        }
        Ok(Self { rows })
    }

    pub fn load(path: &Path) -> Result<Self, CriticalValueError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Critical value for a sample of size `n`.
    ///
    /// # Errors
    /// [`CriticalValueError::InvalidSampleSize`] when `n == 0`.
    pub fn critical_value(&self, n: u64) -> Result<f64, CriticalValueError> {
        match n {
            0 => Err(CriticalValueError::InvalidSampleSize(n)),
            1..=MAX_T_ROW => Ok(self.rows[(n - 1) as usize]),
            _ => Ok(self.large_sample()),
        }
    }

    /// The z row, used for every sample larger than [`MAX_T_ROW`].
    pub fn large_sample(&self) -> f64 {
        self.rows[TABLE_ROWS - 1]
    }

    pub fn rows(&self) -> &[f64; TABLE_ROWS] {
        &self.rows
    }
}

impl Default for ConfidenceTable {
    fn default() -> Self {
        Self::builtin(ConfidenceLevel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_table() -> String {
        (1..=TABLE_ROWS)
            .map(|i| format!("{}.5", i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn rows_are_one_based() {
        let table = ConfidenceTable::parse(&numbered_table()).unwrap();
        for n in 1..=MAX_T_ROW {
            assert_eq!(table.critical_value(n).unwrap(), n as f64 + 0.5);
        }
    }

    #[test]
    fn large_samples_share_the_z_row() {
        let table = ConfidenceTable::parse(&numbered_table()).unwrap();
        let z = table.critical_value(31).unwrap();
        assert_eq!(z, 31.5);
        assert_eq!(table.critical_value(45).unwrap(), z);
        assert_eq!(table.critical_value(100).unwrap(), z);
        assert_eq!(table.large_sample(), z);
    }

    #[test]
    fn zero_sample_size_is_invalid() {
        let table = ConfidenceTable::default();
        assert!(matches!(
            table.critical_value(0),
            Err(CriticalValueError::InvalidSampleSize(0))
        ));
    }

    #[test]
    fn short_table_is_rejected() {
        let text = "1.0\n2.0\n3.0";
        match ConfidenceTable::parse(text) {
            Err(CriticalValueError::WrongRowCount { expected, found }) => {
                assert_eq!(expected, TABLE_ROWS);
                assert_eq!(found, 3);
            }
            other => panic!("expected row-count error, got {other:?}"),
        }
    }

    #[test]
    fn extra_lines_are_ignored() {
        let text = format!("{}\nnot a number\n", numbered_table());
        assert!(ConfidenceTable::parse(&text).is_ok());
    }

    #[test]
    fn garbage_row_is_rejected() {
        let mut lines: Vec<String> = (1..=TABLE_ROWS).map(|i| i.to_string()).collect();
        lines[4] = "t".into();
        match ConfidenceTable::parse(&lines.join("\n")) {
            Err(CriticalValueError::InvalidValue { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected invalid value, got {other:?}"),
        }
        lines[4] = "-2.0".into();
        assert!(ConfidenceTable::parse(&lines.join("\n")).is_err());
    }

    #[test]
    fn builtin_tables_decrease_towards_z() {
        for level in [ConfidenceLevel::P90, ConfidenceLevel::P95, ConfidenceLevel::P99] {
            let table = ConfidenceTable::builtin(level);
            let rows = table.rows();
            for pair in rows.windows(2) {
                assert!(pair[0] > pair[1], "{level}: rows must strictly decrease");
            }
        }
        assert_eq!(ConfidenceTable::builtin(ConfidenceLevel::P95).large_sample(), 1.960);
    }

    #[test]
    fn confidence_level_parsing() {
        assert_eq!("90".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::P90);
        assert_eq!("99%".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::P99);
        assert!("80".parse::<ConfidenceLevel>().is_err());
        assert!("high".parse::<ConfidenceLevel>().is_err());
    }
}
