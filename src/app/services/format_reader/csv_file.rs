//! Two-column `datetime,value` CSV parser
//!
//! The first row is a header and is skipped. Every record must have exactly
//! two fields. Empty or `NaN` value cells are read as missing; zeros are kept
//! as real readings.

use super::ReaderOptions;
use super::field_parsers::{parse_flexible_datetime, parse_value_cell};
use super::stats::{ParseResult, ParseStats};
use crate::app::models::Series;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Parse CSV text into a series
pub fn parse_csv(content: &str, source_name: &str, options: &ReaderOptions) -> Result<ParseResult> {
    let mut stats = ParseStats::new();
    let mut timestamps: Vec<DateTime<Utc>> = Vec::new();
    let mut values = Vec::new();

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(options.csv_has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    if options.csv_has_header {
        let headers = csv_reader
            .headers()
            .map_err(|e| Error::csv_parsing(format!("Failed to read CSV header of {}", source_name), e))?;
        debug!("CSV header: {:?}", headers);
    }

    for result in csv_reader.records() {
        let record = result.map_err(|e| {
            Error::csv_parsing(format!("Failed to read CSV record in {}", source_name), e)
        })?;
        stats.lines_read += 1;
        let line = record.position().map(|position| position.line() as usize);

        if record.len() != 2 {
            return Err(Error::format(
                source_name,
                line,
                format!("expected 2 columns (datetime,value), found {}", record.len()),
            ));
        }

        let timestamp = parse_flexible_datetime(&record[0]).ok_or_else(|| {
            Error::format(
                source_name,
                line,
                format!("unparseable datetime '{}'", &record[0]),
            )
        })?;

        let value = parse_value_cell(&record[1]).map_err(|_| {
            Error::format(
                source_name,
                line,
                format!("value '{}' is not a number", &record[1]),
            )
        })?;

        if let Some(previous) = timestamps.last() {
            if timestamp <= *previous {
                return Err(Error::format(
                    source_name,
                    line,
                    format!(
                        "datetime {} does not follow {}; rows must be strictly increasing",
                        timestamp, previous
                    ),
                ));
            }
        }

        timestamps.push(timestamp);
        values.push(value);
    }

    let series = Series::new(timestamps, values)
        .map_err(|e| Error::format(source_name, None, e.to_string()))?;

    stats.samples = series.len();
    stats.missing = series.missing_count();

    Ok(ParseResult { series, stats })
}
