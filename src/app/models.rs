//! Data models for magfill
//!
//! This module contains the core data structures for representing a
//! magnetometer time series with explicit missing samples and the result of
//! repairing it with one of the gap-filling engines.

use crate::app::services::interpolation::InterpolationMethod;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

// =============================================================================
// Sample
// =============================================================================

/// One reading of the sensor
///
/// `value` is in nanotesla, `None` marks a missing reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    pub fn missing(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value: None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

// =============================================================================
// Series
// =============================================================================

/// Ordered time-indexed series with strictly increasing, unique timestamps
///
/// Missing readings are stored as `None`. A `NaN` handed to the constructor is
/// normalised to `None` so there is exactly one missing encoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<Option<f64>>,
}

impl Series {
    /// Create a new series, validating the index invariant
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<Option<f64>>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(Error::invalid_series(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }

        if let Some(position) = timestamps.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(Error::invalid_series(format!(
                "timestamps must be strictly increasing: {} is followed by {} at position {}",
                timestamps[position],
                timestamps[position + 1],
                position + 1
            )));
        }

        let values = values
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect();

        Ok(Self { timestamps, values })
    }

    /// Build a series from samples that are already in time order
    pub fn from_samples(samples: impl IntoIterator<Item = Sample>) -> Result<Self> {
        let (timestamps, values) = samples
            .into_iter()
            .map(|sample| (sample.timestamp, sample.value))
            .unzip();
        Self::new(timestamps, values)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<Sample> {
        Some(Sample::new(
            *self.timestamps.get(index)?,
            *self.values.get(index)?,
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.timestamps
            .iter()
            .zip(self.values.iter())
            .map(|(timestamp, value)| Sample::new(*timestamp, *value))
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Number of known (non-missing) readings
    pub fn known_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Number of missing readings
    pub fn missing_count(&self) -> usize {
        self.len() - self.known_count()
    }

    /// Mean of all known readings, `None` when every reading is missing
    pub fn known_mean(&self) -> Option<f64> {
        let (sum, count) = self
            .values
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Maximal runs of consecutive missing readings
    pub fn gap_runs(&self) -> Vec<GapRun> {
        let n = self.len();
        let mut runs = Vec::new();
        let mut index = 0;

        while index < n {
            if self.values[index].is_some() {
                index += 1;
                continue;
            }

            let start = index;
            while index < n && self.values[index].is_none() {
                index += 1;
            }

            let kind = match (start == 0, index == n) {
                (true, true) => GapKind::Whole,
                (true, false) => GapKind::Leading,
                (false, true) => GapKind::Trailing,
                (false, false) => GapKind::Interior,
            };
            runs.push(GapRun {
                start,
                len: index - start,
                kind,
            });
        }

        runs
    }

    /// Index range of samples with `start <= timestamp <= end`
    ///
    /// Returns `None` when no sample falls inside the window.
    pub fn index_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Range<usize>> {
        if start > end {
            return None;
        }
        let lower = self.timestamps.partition_point(|t| *t < start);
        let upper = self.timestamps.partition_point(|t| *t <= end);
        (lower < upper).then_some(lower..upper)
    }

    /// Timestamps as seconds elapsed since the first sample
    pub fn elapsed_seconds(&self) -> Vec<f64> {
        match self.first_timestamp() {
            Some(origin) => self
                .timestamps
                .iter()
                .map(|t| (*t - origin).num_milliseconds() as f64 / 1000.0)
                .collect(),
            None => Vec::new(),
        }
    }
}

// =============================================================================
// Gap runs
// =============================================================================

/// Position of a missing run relative to the known readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GapKind {
    /// Before the first known reading; no left bracket
    Leading,
    /// Between two known readings
    Interior,
    /// After the last known reading; no right bracket
    Trailing,
    /// The whole series is missing
    Whole,
}

/// A maximal run of missing readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapRun {
    pub start: usize,
    pub len: usize,
    pub kind: GapKind,
}

impl GapRun {
    /// Index one past the last missing reading of the run
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_interior(&self) -> bool {
        self.kind == GapKind::Interior
    }
}

// =============================================================================
// Repaired series
// =============================================================================

/// The gap-filling method that produced a repaired channel
#[derive(Debug, Clone, PartialEq)]
pub enum RepairMethod {
    Interpolation {
        method: InterpolationMethod,
        order: Option<u32>,
    },
    Seasonal {
        period: usize,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    },
}

impl fmt::Display for RepairMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interpolation {
                method,
                order: Some(order),
            } if method.uses_order() => write!(f, "{} interpolation (order {})", method, order),
            Self::Interpolation { method, .. } => write!(f, "{} interpolation", method),
            Self::Seasonal {
                period,
                window_start,
                window_end,
            } => write!(
                f,
                "seasonal reconstruction (period {}, window {} .. {})",
                period, window_start, window_end
            ),
        }
    }
}

/// A series carrying the untouched original channel and one filled channel
#[derive(Debug, Clone, PartialEq)]
pub struct RepairedSeries {
    timestamps: Vec<DateTime<Utc>>,
    original: Vec<Option<f64>>,
    filled: Vec<Option<f64>>,
    method: RepairMethod,
}

impl RepairedSeries {
    /// Pair an original series with a filled channel of the same length
    pub fn new(original: &Series, filled: Vec<Option<f64>>, method: RepairMethod) -> Result<Self> {
        if filled.len() != original.len() {
            return Err(Error::invalid_series(format!(
                "filled channel has {} values but the series has {}",
                filled.len(),
                original.len()
            )));
        }

        Ok(Self {
            timestamps: original.timestamps().to_vec(),
            original: original.values().to_vec(),
            filled: filled
                .into_iter()
                .map(|value| value.filter(|v| !v.is_nan()))
                .collect(),
            method,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn original(&self) -> &[Option<f64>] {
        &self.original
    }

    pub fn filled(&self) -> &[Option<f64>] {
        &self.filled
    }

    pub fn method(&self) -> &RepairMethod {
        &self.method
    }

    /// The original channel as a standalone series
    pub fn original_series(&self) -> Series {
        Series {
            timestamps: self.timestamps.clone(),
            values: self.original.clone(),
        }
    }

    /// The filled channel as a standalone series
    pub fn filled_series(&self) -> Series {
        Series {
            timestamps: self.timestamps.clone(),
            values: self.filled.clone(),
        }
    }

    /// Positions missing in the original that now carry a value
    pub fn filled_count(&self) -> usize {
        self.original
            .iter()
            .zip(&self.filled)
            .filter(|(original, filled)| original.is_none() && filled.is_some())
            .count()
    }

    /// Positions still missing in the filled channel
    pub fn remaining_missing(&self) -> usize {
        self.filled.iter().filter(|v| v.is_none()).count()
    }

    /// Known original readings that the filled channel replaced with another value
    pub fn overwritten_count(&self) -> usize {
        self.original
            .iter()
            .zip(&self.filled)
            .filter(|(original, filled)| match (original, filled) {
                (Some(a), Some(b)) => a != b,
                (Some(_), None) => true,
                _ => false,
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let origin = Utc.with_ymd_and_hms(2019, 5, 23, 0, 0, 0).unwrap();
        (0..n)
            .map(|k| origin + Duration::seconds(20 * k as i64))
            .collect()
    }

    #[test]
    fn test_series_rejects_length_mismatch() {
        let result = Series::new(timestamps(3), vec![Some(1.0), None]);
        assert!(matches!(result, Err(Error::InvalidSeries { .. })));
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let mut ts = timestamps(3);
        ts[2] = ts[1];
        let result = Series::new(ts, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert!(matches!(result, Err(Error::InvalidSeries { .. })));
    }

    #[test]
    fn test_series_normalises_nan_to_missing() {
        let series = Series::new(timestamps(2), vec![Some(f64::NAN), Some(4.0)]).unwrap();
        assert_eq!(series.values(), &[None, Some(4.0)]);
        assert_eq!(series.missing_count(), 1);
    }

    #[test]
    fn test_known_mean_ignores_missing() {
        let series = Series::new(timestamps(4), vec![Some(1.0), None, Some(3.0), None]).unwrap();
        assert_eq!(series.known_mean(), Some(2.0));

        let all_missing = Series::new(timestamps(2), vec![None, None]).unwrap();
        assert_eq!(all_missing.known_mean(), None);
    }

    #[test]
    fn test_gap_runs_classification() {
        let series = Series::new(
            timestamps(8),
            vec![None, Some(1.0), None, None, Some(2.0), Some(3.0), None, None],
        )
        .unwrap();

        let runs = series.gap_runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].kind, GapKind::Leading);
        assert_eq!((runs[1].start, runs[1].len), (2, 2));
        assert!(runs[1].is_interior());
        assert_eq!(runs[2].kind, GapKind::Trailing);
        assert_eq!(runs[2].end(), 8);
    }

    #[test]
    fn test_index_range_is_inclusive() {
        let ts = timestamps(10);
        let series = Series::new(ts.clone(), vec![Some(0.0); 10]).unwrap();

        assert_eq!(series.index_range(ts[2], ts[5]), Some(2..6));
        assert_eq!(
            series.index_range(ts[0] - Duration::hours(1), ts[1]),
            Some(0..2)
        );
        assert_eq!(series.index_range(ts[5], ts[2]), None);
        assert_eq!(
            series.index_range(ts[9] + Duration::seconds(1), ts[9] + Duration::hours(1)),
            None
        );
    }

    #[test]
    fn test_elapsed_seconds() {
        let series = Series::new(timestamps(3), vec![None; 3]).unwrap();
        assert_eq!(series.elapsed_seconds(), vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn test_repaired_series_counts() {
        let series = Series::new(timestamps(4), vec![Some(1.0), None, Some(3.0), None]).unwrap();
        let repaired = RepairedSeries::new(
            &series,
            vec![Some(1.5), Some(2.0), Some(3.0), None],
            RepairMethod::Interpolation {
                method: InterpolationMethod::Linear,
                order: None,
            },
        )
        .unwrap();

        assert_eq!(repaired.filled_count(), 1);
        assert_eq!(repaired.remaining_missing(), 1);
        assert_eq!(repaired.overwritten_count(), 1);
        assert_eq!(repaired.original_series(), series);
    }

    #[test]
    fn test_repaired_series_rejects_wrong_length() {
        let series = Series::new(timestamps(2), vec![Some(1.0), None]).unwrap();
        let result = RepairedSeries::new(
            &series,
            vec![Some(1.0)],
            RepairMethod::Interpolation {
                method: InterpolationMethod::Linear,
                order: None,
            },
        );
        assert!(result.is_err());
    }
}
