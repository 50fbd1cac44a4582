//! CSV exporter for repaired series
//!
//! The default layout is `datetime,value` holding the filled channel, which
//! the CSV reader accepts back unchanged. With `include_original` the columns
//! are `datetime,original,filled`. Missing values are written as empty cells.

use crate::app::models::RepairedSeries;
use crate::config::ExportConfig;
use crate::constants::{EXPORT_DATETIME_FORMAT, columns};
use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Layout of the exported CSV
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Write the original channel next to the filled one
    pub include_original: bool,
    /// strftime layout of the datetime column
    pub datetime_format: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_original: false,
            datetime_format: EXPORT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            include_original: config.include_original,
            datetime_format: config.datetime_format.clone(),
        }
    }
}

impl ExportOptions {
    pub fn with_original(mut self) -> Self {
        self.include_original = true;
        self
    }

    fn header(&self) -> &'static [&'static str] {
        if self.include_original {
            &[columns::DATETIME, columns::ORIGINAL, columns::FILLED]
        } else {
            &[columns::DATETIME, columns::VALUE]
        }
    }
}

/// Write a repaired series as CSV, returning the number of data rows
pub fn export<W: Write>(
    repaired: &RepairedSeries,
    writer: W,
    options: &ExportOptions,
) -> Result<usize> {
    let format = parse_datetime_format(&options.datetime_format)?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(options.header())?;

    let rows = repaired
        .timestamps()
        .iter()
        .zip(repaired.original().iter().zip(repaired.filled()));

    for (timestamp, (original, filled)) in rows {
        let datetime = format_timestamp(timestamp, &format);
        if options.include_original {
            csv_writer.write_record([datetime, format_value(*original), format_value(*filled)])?;
        } else {
            csv_writer.write_record([datetime, format_value(*filled)])?;
        }
    }

    csv_writer
        .flush()
        .map_err(|e| Error::io("Failed to flush CSV output", e))?;
    Ok(repaired.len())
}

/// Export into an in-memory string
pub fn export_to_string(repaired: &RepairedSeries, options: &ExportOptions) -> Result<String> {
    let mut buffer = Vec::new();
    export(repaired, &mut buffer, options)?;
    String::from_utf8(buffer).map_err(|e| {
        Error::io(
            "Exported CSV is not valid UTF-8",
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })
}

/// Export to a file, creating or truncating it
pub fn export_to_path(
    repaired: &RepairedSeries,
    path: &Path,
    options: &ExportOptions,
) -> Result<usize> {
    let file = File::create(path)
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
    let rows = export(repaired, BufWriter::new(file), options)?;
    info!("Wrote {} rows to {}", rows, path.display());
    Ok(rows)
}

fn parse_datetime_format(format: &str) -> Result<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if format.is_empty() || items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(Error::configuration(format!(
            "'{}' is not a valid datetime format",
            format
        )));
    }
    Ok(items)
}

fn format_timestamp(timestamp: &DateTime<Utc>, format: &[Item<'_>]) -> String {
    timestamp
        .format_with_items(format.iter())
        .to_string()
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
