//! Working state of one loaded series
//!
//! A [`Session`] owns the untouched original series and the most recent
//! repair result. Every repair starts from the original, so running a second
//! method replaces the first result instead of stacking on top of it. A failed
//! repair leaves the previous result in place.

use super::exporter::{self, ExportOptions};
use super::format_reader::{FileKind, FormatReader, ParseStats, ReaderOptions};
use super::interpolation::{self, InterpolationMethod};
use super::seasonal;
use crate::app::models::{RepairedSeries, Series};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Session {
    source: String,
    original: Series,
    stats: Option<ParseStats>,
    current: Option<RepairedSeries>,
}

impl Session {
    /// Load a MAG or CSV file; the format is guessed from the extension unless given
    pub fn load(path: &Path, kind: Option<FileKind>, options: ReaderOptions) -> Result<Self> {
        let result = FormatReader::new(options).read_file(path, kind)?;
        Ok(Self {
            source: path.display().to_string(),
            original: result.series,
            stats: Some(result.stats),
            current: None,
        })
    }

    /// Start a session from a series built in memory
    pub fn from_series(source: impl Into<String>, series: Series) -> Self {
        Self {
            source: source.into(),
            original: series,
            stats: None,
            current: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn original(&self) -> &Series {
        &self.original
    }

    /// Parse statistics when the series came from a file
    pub fn stats(&self) -> Option<&ParseStats> {
        self.stats.as_ref()
    }

    /// Latest successful repair, if any
    pub fn current(&self) -> Option<&RepairedSeries> {
        self.current.as_ref()
    }

    /// Fill interior gaps of the original series by interpolation
    pub fn interpolate(
        &mut self,
        method: InterpolationMethod,
        order: Option<u32>,
    ) -> Result<&RepairedSeries> {
        let repaired = interpolation::interpolate(&self.original, method, order)
            .inspect_err(|e| warn!("Interpolation of {} failed: {}", self.source, e))?;
        Ok(self.current.insert(repaired))
    }

    /// Seasonal reconstruction of the original series with a forced repair window
    pub fn seasonal(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: usize,
    ) -> Result<&RepairedSeries> {
        let repaired =
            seasonal::seasonal_reconstruct_with_period(&self.original, start, end, period)
                .inspect_err(|e| warn!("Seasonal reconstruction of {} failed: {}", self.source, e))?;
        Ok(self.current.insert(repaired))
    }

    /// Write the current result as CSV
    pub fn export_to_path(&self, path: &Path, options: &ExportOptions) -> Result<usize> {
        let repaired = self.current.as_ref().ok_or_else(|| {
            Error::configuration(format!(
                "No repaired series to export for {}; run a repair first",
                self.source
            ))
        })?;
        info!("Exporting {} ({})", self.source, repaired.method());
        exporter::export_to_path(repaired, path, options)
    }
}
