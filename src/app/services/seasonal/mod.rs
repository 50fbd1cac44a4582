//! Seasonal reconstruction engine
//!
//! Fills missing readings from an additive seasonal decomposition and
//! force-overwrites a caller-supplied window of known-bad measurements.
//!
//! - [`decomposition`] - classical additive decomposition with linear edge
//!   extrapolation of the trend
//! - [`reconstruction`] - the two-pass fill and the window overwrite
//!
//! The decomposition needs at least two full periods of data. With the
//! default period of 4320 samples (one day at 20 s cadence) that is 8640
//! samples.

pub mod decomposition;
pub mod reconstruction;

#[cfg(test)]
mod tests;

pub use decomposition::{Decomposition, decompose_additive};
pub use reconstruction::{
    SeasonalPasses, run_passes, seasonal_reconstruct, seasonal_reconstruct_with_period,
};
