//! Classical additive seasonal decomposition
//!
//! `observed = trend + seasonal + residual`, where
//! - the trend is a centred moving average over one period (a 2 x period
//!   filter with half weights at both ends when the period is even),
//! - the undefined trend at both edges is extrapolated linearly from a
//!   least-squares line through the nearest `period - 1` trend values,
//! - the seasonal component is the per-phase mean of the detrended series,
//!   shifted so that one period sums to zero.

use crate::constants::MIN_DECOMPOSITION_CYCLES;
use crate::{Error, Result};
use serde::Serialize;
use std::ops::Range;

/// Components of an additive decomposition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    pub observed: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
    pub period: usize,
}

impl Decomposition {
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Trend plus seasonal component, the residual left out
    pub fn reconstruction(&self) -> Vec<f64> {
        self.trend
            .iter()
            .zip(&self.seasonal)
            .map(|(trend, seasonal)| trend + seasonal)
            .collect()
    }

    /// One period of the seasonal component, starting at phase zero
    pub fn seasonal_profile(&self) -> &[f64] {
        &self.seasonal[..self.period.min(self.seasonal.len())]
    }
}

/// Decompose a complete series (no missing values) with the given period
pub fn decompose_additive(values: &[f64], period: usize) -> Result<Decomposition> {
    let n = values.len();

    if period < 2 {
        return Err(Error::decomposition(format!(
            "period must be at least 2 samples, got {}",
            period
        )));
    }
    let required = period * MIN_DECOMPOSITION_CYCLES;
    if n < required {
        return Err(Error::decomposition(format!(
            "series has {} samples but period {} needs at least {} ({} complete cycles)",
            n, period, required, MIN_DECOMPOSITION_CYCLES
        )));
    }
    if let Some(position) = values.iter().position(|v| !v.is_finite()) {
        return Err(Error::decomposition(format!(
            "decomposition needs a complete series; value at position {} is {}",
            position, values[position]
        )));
    }

    let half = period / 2;
    let mut trend = centred_moving_average(values, period);
    extrapolate_edges(&mut trend, half, n - 1 - half, period - 1);

    let detrended: Vec<f64> = values.iter().zip(&trend).map(|(x, t)| x - t).collect();

    let mut profile: Vec<f64> = (0..period)
        .map(|phase| {
            let (sum, count) = detrended
                .iter()
                .skip(phase)
                .step_by(period)
                .fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));
            sum / count as f64
        })
        .collect();
    let profile_mean = profile.iter().sum::<f64>() / period as f64;
    profile.iter_mut().for_each(|p| *p -= profile_mean);

    let seasonal: Vec<f64> = (0..n).map(|i| profile[i % period]).collect();
    let residual: Vec<f64> = detrended
        .iter()
        .zip(&seasonal)
        .map(|(d, s)| d - s)
        .collect();

    Ok(Decomposition {
        observed: values.to_vec(),
        trend,
        seasonal,
        residual,
        period,
    })
}

/// Centred moving average; positions closer than `period / 2` to an edge are NaN
fn centred_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let half = period / 2;
    let even = period % 2 == 0;

    // Work on deviations from the mean so the running sum stays small
    let offset = values.iter().sum::<f64>() / n as f64;
    let centred: Vec<f64> = values.iter().map(|v| v - offset).collect();

    let mut trend = vec![f64::NAN; n];
    let mut window_sum: f64 = centred[..=2 * half].iter().sum();

    for i in half..n - half {
        let full = if even {
            window_sum - 0.5 * (centred[i - half] + centred[i + half])
        } else {
            window_sum
        };
        trend[i] = full / period as f64 + offset;

        if i + half + 1 < n {
            window_sum += centred[i + half + 1] - centred[i - half];
        }
    }

    trend
}

/// Replace the NaN edges outside `front..=back` with least-squares lines
fn extrapolate_edges(trend: &mut [f64], front: usize, back: usize, points: usize) {
    let front_last = (front + points).min(back);
    let (slope, intercept) = fit_line(trend, front..front_last.max(front + 1));
    for (i, value) in trend.iter_mut().enumerate().take(front) {
        *value = slope * i as f64 + intercept;
    }

    let back_first = back.saturating_sub(points).max(front);
    let (slope, intercept) = fit_line(trend, back_first..back.max(back_first + 1));
    for (i, value) in trend.iter_mut().enumerate().skip(back + 1) {
        *value = slope * i as f64 + intercept;
    }
}

/// Least-squares line `value = slope * index + intercept` over `range`
fn fit_line(values: &[f64], range: Range<usize>) -> (f64, f64) {
    let count = range.len() as f64;
    let mean_x = range.clone().map(|i| i as f64).sum::<f64>() / count;
    let mean_y = range.clone().map(|i| values[i]).sum::<f64>() / count;

    let (sxx, sxy) = range.fold((0.0, 0.0), |(sxx, sxy), i| {
        let dx = i as f64 - mean_x;
        (sxx + dx * dx, sxy + dx * (values[i] - mean_y))
    });

    if sxx == 0.0 {
        return (0.0, mean_y);
    }
    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x)
}
