//! Two-pass seasonal reconstruction
//!
//! 1. Missing readings are replaced by the mean of the known readings.
//! 2. The placeholder series is decomposed; trend + seasonal is the first
//!    reconstruction.
//! 3. Missing readings take the first reconstruction at their position.
//! 4. The corrected series is decomposed again for the second reconstruction.
//! 5. The filled channel is the corrected series with every sample inside the
//!    repair window overwritten by the second reconstruction, whether it was
//!    missing or not.

use super::decomposition::decompose_additive;
use crate::app::models::{RepairMethod, RepairedSeries, Series};
use crate::constants::{DEFAULT_SEASONAL_PERIOD, MIN_DECOMPOSITION_CYCLES};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Intermediate signals of the two decomposition passes
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalPasses {
    /// Trend + seasonal of the mean-filled series
    pub first: Vec<f64>,
    /// Original readings with missing positions taken from `first`
    pub corrected: Vec<f64>,
    /// Trend + seasonal of `corrected`
    pub second: Vec<f64>,
}

/// Run both decomposition passes over a series
pub fn run_passes(series: &Series, period: usize) -> Result<SeasonalPasses> {
    let required = period * MIN_DECOMPOSITION_CYCLES;
    if series.len() < required {
        return Err(Error::decomposition(format!(
            "series has {} samples but seasonal reconstruction with period {} needs at least {}",
            series.len(),
            period,
            required
        )));
    }

    let mean = series
        .known_mean()
        .ok_or_else(|| Error::decomposition("series has no known readings to reconstruct from"))?;
    debug!("Mean of known readings: {}", mean);

    let placeholder: Vec<f64> = series.values().iter().map(|v| v.unwrap_or(mean)).collect();
    let first = decompose_additive(&placeholder, period)?.reconstruction();

    let corrected: Vec<f64> = series
        .values()
        .iter()
        .zip(&first)
        .map(|(value, estimate)| value.unwrap_or(*estimate))
        .collect();
    let second = decompose_additive(&corrected, period)?.reconstruction();

    Ok(SeasonalPasses {
        first,
        corrected,
        second,
    })
}

/// Reconstruct with the default period of 4320 samples
pub fn seasonal_reconstruct(
    series: &Series,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<RepairedSeries> {
    seasonal_reconstruct_with_period(series, start, end, DEFAULT_SEASONAL_PERIOD)
}

/// Reconstruct missing readings and overwrite the window `[start, end]`
pub fn seasonal_reconstruct_with_period(
    series: &Series,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period: usize,
) -> Result<RepairedSeries> {
    if start > end {
        return Err(Error::decomposition(format!(
            "repair window start {} is after its end {}",
            start, end
        )));
    }

    info!(
        "Seasonal reconstruction of {} samples ({} missing), period {}, window {} .. {}",
        series.len(),
        series.missing_count(),
        period,
        start,
        end
    );

    let passes = run_passes(series, period)?;

    let window = series.index_range(start, end).ok_or_else(|| {
        Error::decomposition(format!(
            "repair window {} .. {} lies outside the series range {} .. {}",
            start,
            end,
            series
                .first_timestamp()
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
            series
                .last_timestamp()
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
        ))
    })?;
    debug!("Window covers samples {:?}", window);

    let mut filled: Vec<Option<f64>> = passes.corrected.into_iter().map(Some).collect();
    for i in window.clone() {
        filled[i] = Some(passes.second[i]);
    }

    let repaired = RepairedSeries::new(
        series,
        filled,
        RepairMethod::Seasonal {
            period,
            window_start: start,
            window_end: end,
        },
    )?;

    info!(
        "Reconstructed {} missing samples, overwrote {} samples inside the window",
        repaired.filled_count(),
        window.len()
    );
    Ok(repaired)
}
