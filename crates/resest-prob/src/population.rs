use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::histogram::Histogram;

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("Failed to read population: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: `{text}` is not an integer resource level")]
    Parse { line: usize, text: String },
    #[error("Population is empty")]
    Empty,
}

/// True resource levels of every node; the index is the node identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    levels: Vec<i64>,
}

impl Population {
    /// Build a population from in-memory levels.
    ///
    /// # Errors
    /// [`PopulationError::Empty`] when `levels` is empty.
    pub fn new(levels: Vec<i64>) -> Result<Self, PopulationError> {
        if levels.is_empty() {
            return Err(PopulationError::Empty);
        }
        Ok(Self { levels })
    }

    /// Parse one integer per line, stopping after `limit` levels when given.
    ///
    /// Blank lines are skipped. Values are not range-checked here; negative
    /// levels are rejected later by the classifier.
    pub fn from_reader<R: BufRead>(reader: R, limit: Option<usize>) -> Result<Self, PopulationError> {
        let mut levels = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            if limit.is_some_and(|max| levels.len() >= max) {
                break;
            }
            let line = line?;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let level = text.parse::<i64>().map_err(|_| PopulationError::Parse {
                line: idx + 1,
                text: text.to_string(),
            })?;
            levels.push(level);
        }
        Self::new(levels)
    }

    /// Load the first `limit` levels of a population file.
    pub fn load(path: &Path, limit: Option<usize>) -> Result<Self, PopulationError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), limit)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a constructed population; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Resource level of node `id`.
    pub fn level(&self, id: usize) -> Option<i64> {
        self.levels.get(id).copied()
    }

    pub fn levels(&self) -> &[i64] {
        &self.levels
    }

    /// The first `len` nodes, or the whole population if it is shorter.
    pub fn prefix(&self, len: usize) -> Result<Self, PopulationError> {
        Self::new(self.levels[..len.min(self.levels.len())].to_vec())
    }

    /// Ground-truth value → count histogram over every node.
    pub fn histogram(&self) -> Histogram {
        let mut histogram = Histogram::new();
        for &level in &self.levels {
            *histogram.entry(level).or_insert(0) += 1;
        }
        histogram
    }

    /// True mean resource level.
    pub fn mean(&self) -> f64 {
        let sum: f64 = self.levels.iter().map(|&l| l as f64).sum();
        sum / self.levels.len() as f64
    }
}
