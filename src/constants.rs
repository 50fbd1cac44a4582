//! Application constants for magfill
//!
//! This module contains the sampling constants, default parameters and
//! text formats used throughout the magfill pipeline.

// =============================================================================
// Sampling
// =============================================================================

/// Nominal cadence between consecutive raw magnetometer samples
pub const SAMPLE_INTERVAL_SECS: i64 = 20;

/// Seasonal period used by the reconstruction engine, in samples (24 * 60 * 3)
///
/// At the 20-second cadence this spans one day of readings.
pub const DEFAULT_SEASONAL_PERIOD: usize = 24 * 60 * 3;

/// Number of complete periods the decomposition needs
pub const MIN_DECOMPOSITION_CYCLES: usize = 2;

// =============================================================================
// Interpolation
// =============================================================================

/// Default interpolation order for order-requiring methods
pub const DEFAULT_INTERPOLATION_ORDER: u32 = 3;

/// Highest B-spline degree accepted by the `spline` and `polynomial` methods
pub const MAX_SPLINE_DEGREE: usize = 5;

/// Interpolation method names accepted on the command line
pub const INTERPOLATION_METHOD_NAMES: &[&str] =
    &["linear", "quadratic", "cubic", "spline", "polynomial"];

// =============================================================================
// Repair window
// =============================================================================

/// Start of the known-bad measurement window overwritten by seasonal reconstruction
pub const DEFAULT_WINDOW_START: &str = "2019-05-23 05:30:00";

/// End of the known-bad measurement window (inclusive)
pub const DEFAULT_WINDOW_END: &str = "2019-05-25 06:24:30";

// =============================================================================
// Text formats
// =============================================================================

/// Timestamp format written by the exporter; sub-second parts only appear when non-zero
pub const EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Naive datetime layouts accepted by the CSV reader, tried in order
pub const CSV_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S",
];

/// Date-only layouts accepted by the CSV reader (midnight is assumed)
pub const CSV_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Tokens the CSV reader treats as a missing value
pub const CSV_MISSING_TOKENS: &[&str] = &["", "nan", "NaN", "NAN", "NA", "null"];

/// Column names of the exported CSV
pub mod columns {
    pub const DATETIME: &str = "datetime";
    pub const VALUE: &str = "value";
    pub const ORIGINAL: &str = "original";
    pub const FILLED: &str = "filled";
}

// =============================================================================
// Configuration
// =============================================================================

/// Directory name under the platform config directory
pub const CONFIG_DIR_NAME: &str = "magfill";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the seasonal period
pub const ENV_SEASONAL_PERIOD: &str = "MAGFILL_SEASONAL_PERIOD";

/// Environment variable overriding the default interpolation method
pub const ENV_INTERPOLATION_METHOD: &str = "MAGFILL_INTERPOLATION_METHOD";
