//! Format reader for magnetometer time series files
//!
//! This module turns raw MAG or CSV text into a uniform [`Series`]. Parsing is
//! pure: the file is read into memory in one go and the handle released
//! before any tokenising happens.
//!
//! ## Architecture
//!
//! - [`mag`] - day-blocked MAG format (`YYYY/MM/DD` headers, 20 s samples)
//! - [`csv_file`] - two-column `datetime,value` CSV
//! - [`field_parsers`] - date header, datetime and value cell parsing
//! - [`stats`] - parse statistics and result structures
//!
//! ## Zero readings in MAG files
//!
//! The magnetometer writes `0` when it drops out, so MAG tokens equal to zero
//! are recoded as missing. A genuine zero reading cannot be told apart from a
//! dropout. The recoding is on by default and can be switched off through
//! [`ReaderOptions::zero_is_missing`]. CSV input is never recoded.
//!
//! ## Usage
//!
//! ```rust
//! use magfill::app::services::format_reader::{FileKind, FormatReader};
//!
//! # fn example() -> magfill::Result<()> {
//! let reader = FormatReader::default();
//! let result = reader.parse_str("2019/05/23\n100 0 102\n", FileKind::Mag, "inline")?;
//! assert_eq!(result.series.len(), 3);
//! assert_eq!(result.series.missing_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod csv_file;
pub mod field_parsers;
pub mod mag;
pub mod stats;

#[cfg(test)]
pub mod tests;

use crate::app::models::Series;
use crate::config::ReaderConfig;
use crate::{Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

// Re-export main types for easy access
pub use stats::{ParseResult, ParseStats};

/// Input file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Mag,
    Csv,
}

impl FileKind {
    /// Guess the format from a file extension (`.csv` is CSV, anything else MAG)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Mag,
        }
    }
}

impl FromStr for FileKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mag" => Ok(Self::Mag),
            "csv" => Ok(Self::Csv),
            other => Err(Error::configuration(format!(
                "Unknown file format '{}': expected 'mag' or 'csv'",
                other
            ))),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mag => write!(f, "MAG"),
            Self::Csv => write!(f, "CSV"),
        }
    }
}

/// Options controlling how raw text is interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions {
    /// Recode MAG tokens equal to zero as missing (sensor dropout convention)
    pub zero_is_missing: bool,

    /// Skip the first CSV row as a header
    pub csv_has_header: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            zero_is_missing: true,
            csv_has_header: true,
        }
    }
}

impl From<&ReaderConfig> for ReaderOptions {
    fn from(config: &ReaderConfig) -> Self {
        Self {
            zero_is_missing: config.mag_zero_is_missing,
            csv_has_header: config.csv_has_header,
        }
    }
}

/// Reader for MAG and CSV magnetometer files
#[derive(Debug, Clone, Default)]
pub struct FormatReader {
    options: ReaderOptions,
}

impl FormatReader {
    /// Create a new reader with the given options
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Read and parse a file, guessing the format from its extension unless given
    pub fn read_file(&self, path: &Path, kind: Option<FileKind>) -> Result<ParseResult> {
        let kind = kind.unwrap_or_else(|| FileKind::from_path(path));
        info!("Reading {} file: {}", kind, path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read file {}", path.display()), e)
        })?;

        let source_name = path.display().to_string();
        self.parse_str(&content, kind, &source_name)
    }

    /// Parse already-loaded text; `source_name` is only used in error messages
    pub fn parse_str(&self, content: &str, kind: FileKind, source_name: &str) -> Result<ParseResult> {
        let result = match kind {
            FileKind::Mag => mag::parse_mag(content, source_name, &self.options)?,
            FileKind::Csv => csv_file::parse_csv(content, source_name, &self.options)?,
        };

        info!(
            "Parsed {} samples ({} missing) from {}",
            result.stats.samples, result.stats.missing, source_name
        );
        Ok(result)
    }
}

/// Parse MAG text with default options
pub fn read_mag_str(content: &str) -> Result<Series> {
    Ok(mag::parse_mag(content, "<string>", &ReaderOptions::default())?.series)
}

/// Parse CSV text with default options
pub fn read_csv_str(content: &str) -> Result<Series> {
    Ok(csv_file::parse_csv(content, "<string>", &ReaderOptions::default())?.series)
}
