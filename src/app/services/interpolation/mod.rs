//! Interpolation engine
//!
//! Fills every interior gap of a series in a single pass using one of the
//! methods in [`InterpolationMethod`]. Interpolation runs over elapsed time,
//! not sample position. Leading and trailing missing runs have no bracket on
//! one side and stay missing; there is no extrapolation.
//!
//! The input series is borrowed and never modified. The result carries the
//! original channel unchanged next to the filled channel.

pub mod method;
pub mod spline;

#[cfg(test)]
mod tests;

use crate::Result;
use crate::app::models::{RepairMethod, RepairedSeries, Series};
use tracing::{debug, info};

pub use method::{InterpolationMethod, Kernel};
pub use spline::InterpolatingSpline;

/// Fill interior gaps of `series` with the chosen method
///
/// `order` is required (and must be positive) for every method except
/// `linear`, where it is ignored.
pub fn interpolate(
    series: &Series,
    method: InterpolationMethod,
    order: Option<u32>,
) -> Result<RepairedSeries> {
    let kernel = method.kernel(order)?;
    let repair = RepairMethod::Interpolation {
        method,
        order: order.filter(|_| method.uses_order()),
    };

    let values = series.values();
    let mut filled = values.to_vec();
    let gaps: Vec<_> = series
        .gap_runs()
        .into_iter()
        .filter(|gap| gap.is_interior())
        .collect();

    info!(
        "Interpolating {} interior gaps ({} missing samples) with {}",
        gaps.len(),
        gaps.iter().map(|gap| gap.len).sum::<usize>(),
        method
    );

    if gaps.is_empty() {
        return RepairedSeries::new(series, filled, repair);
    }

    let elapsed = series.elapsed_seconds();
    let known_positions: Vec<usize> = (0..values.len()).filter(|&i| values[i].is_some()).collect();
    let known_x: Vec<f64> = known_positions.iter().map(|&i| elapsed[i]).collect();
    let known_y: Vec<f64> = known_positions.iter().filter_map(|&i| values[i]).collect();

    match kernel {
        Kernel::Linear => {
            for gap in &gaps {
                let (left, right) = (gap.start - 1, gap.end());
                let (x0, x1) = (elapsed[left], elapsed[right]);
                let (y0, y1) = (known_value(values, left), known_value(values, right));
                for i in gap.start..gap.end() {
                    filled[i] = Some(y0 + (y1 - y0) * (elapsed[i] - x0) / (x1 - x0));
                }
            }
        }
        Kernel::Spline { degree } => {
            let spline = InterpolatingSpline::fit(&known_x, &known_y, degree)?;
            debug!(
                "Fitted degree {} spline through {} known samples",
                degree,
                known_x.len()
            );
            for gap in &gaps {
                for i in gap.start..gap.end() {
                    filled[i] = Some(spline.evaluate(elapsed[i]));
                }
            }
        }
    }

    let repaired = RepairedSeries::new(series, filled, repair)?;
    info!(
        "Filled {} samples, {} still missing",
        repaired.filled_count(),
        repaired.remaining_missing()
    );
    Ok(repaired)
}

fn known_value(values: &[Option<f64>], index: usize) -> f64 {
    // Interior gaps are bracketed by known samples on both sides
    values[index].unwrap_or(f64::NAN)
}
