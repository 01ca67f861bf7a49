use crate::error::{AnalyzerError, Result};
use serde::Serialize;
use std::fmt;

// Rounds are signed 64-bit on the indexer side
pub const MAX_ROUND: u64 = i64::MAX as u64;

/// Inclusive round interval, `min <= max` always holds once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundRange {
    min: u64,
    max: u64,
}

impl RoundRange {
    pub fn new(min: u64, max: u64) -> Result<Self> {
        if max > MAX_ROUND {
            return Err(AnalyzerError::InvalidRange(format!(
                "end round {} is above the largest round {}",
                max, MAX_ROUND
            )));
        }
        if max < min {
            return Err(AnalyzerError::InvalidRange(format!(
                "end round {} is below start round {}",
                max, min
            )));
        }
        Ok(RoundRange { min, max })
    }

    /// Validates raw form input. Absent, non-numeric and negative bounds are rejected.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Result<Self> {
        let min = parse_bound("start", min)?;
        let max = parse_bound("end", max)?;
        RoundRange::new(min, max)
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn is_single(&self) -> bool {
        self.min == self.max
    }

    pub fn block_count(&self) -> u64 {
        self.max - self.min + 1
    }
}

impl fmt::Display for RoundRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

fn parse_bound(label: &str, raw: Option<&str>) -> Result<u64> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AnalyzerError::InvalidRange(format!("{} round is missing", label)))?;

    let value: i64 = raw.parse().map_err(|_| {
        AnalyzerError::InvalidRange(format!("{} round {:?} is not a number", label, raw))
    })?;

    u64::try_from(value)
        .map_err(|_| AnalyzerError::InvalidRange(format!("{} round {} is negative", label, value)))
}
