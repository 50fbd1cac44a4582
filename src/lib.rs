//! Magfill Library
//!
//! A Rust library for repairing geomagnetic sensor time series recorded at a
//! fixed 20-second cadence.
//!
//! This library provides tools for:
//! - Parsing day-blocked MAG magnetometer files and two-column CSV exports
//! - Representing a series with explicit missing samples
//! - Filling gaps by linear, polynomial or B-spline interpolation
//! - Two-pass seasonal reconstruction with a forced repair window
//! - Exporting the repaired channel back to CSV
//!
//! The original channel of a loaded series is never modified; every repair
//! produces a new [`RepairedSeries`] carrying both channels.

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod exporter;
        pub mod format_reader;
        pub mod interpolation;
        pub mod seasonal;
        pub mod session;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{GapRun, RepairMethod, RepairedSeries, Sample, Series};
pub use app::services::exporter::{ExportOptions, export, export_to_path, export_to_string};
pub use app::services::format_reader::{FileKind, ParseResult, ParseStats, ReaderOptions};
pub use app::services::interpolation::{InterpolationMethod, interpolate};
pub use app::services::seasonal::{Decomposition, decompose_additive, seasonal_reconstruct};
pub use app::services::session::Session;
pub use config::Config;

/// Result type alias for magfill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for parsing, gap filling and export
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed MAG or CSV input
    #[error("Format error in '{source_name}'{}: {message}", line_suffix(.line))]
    Format {
        source_name: String,
        line: Option<usize>,
        message: String,
    },

    /// Unsupported interpolation method or invalid order
    #[error("Interpolation error: {message}")]
    Interpolation { message: String },

    /// Seasonal decomposition could not run on the given series or window
    #[error("Decomposition error: {message}")]
    Decomposition { message: String },

    /// A series violating the ordered, duplicate-free index invariant
    #[error("Invalid series: {message}")]
    InvalidSeries { message: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reading or writing failed below the record level
    #[error("CSV error: {message}")]
    CsvParsing {
        message: String,
        #[source]
        source: csv::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

impl Error {
    /// Create a format error for a named input
    pub fn format(
        source_name: impl Into<String>,
        line: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self::Format {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an interpolation error
    pub fn interpolation(message: impl Into<String>) -> Self {
        Self::Interpolation {
            message: message.into(),
        }
    }

    /// Create a decomposition error
    pub fn decomposition(message: impl Into<String>) -> Self {
        Self::Decomposition {
            message: message.into(),
        }
    }

    /// Create an invalid series error
    pub fn invalid_series(message: impl Into<String>) -> Self {
        Self::InvalidSeries {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV error with context
    pub fn csv_parsing(message: impl Into<String>, source: csv::Error) -> Self {
        Self::CsvParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the error was caused by bad user input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Format { .. }
                | Self::Interpolation { .. }
                | Self::Decomposition { .. }
                | Self::InvalidSeries { .. }
                | Self::Configuration { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            message: "CSV operation failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid configuration file: {}", error),
        }
    }
}
