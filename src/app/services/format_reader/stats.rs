//! Parsing statistics and result structures for magnetometer files

use crate::app::models::Series;

/// Parsing result with the series and basic statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parsed series
    pub series: Series,

    /// Basic parsing statistics
    pub stats: ParseStats,
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ParseStats {
    /// Lines (MAG) or records (CSV) seen in the input
    pub lines_read: usize,

    /// Number of MAG day blocks; zero for CSV input
    pub day_blocks: usize,

    /// Samples in the produced series
    pub samples: usize,

    /// Missing samples in the produced series
    pub missing: usize,

    /// MAG tokens equal to zero that were recoded as missing
    pub zero_recoded: usize,

    /// Non-blank lines ignored before the first MAG date header
    pub skipped_lines: usize,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of samples that carry a reading, as a percentage
    pub fn coverage(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            ((self.samples - self.missing) as f64 / self.samples as f64) * 100.0
        }
    }
}
