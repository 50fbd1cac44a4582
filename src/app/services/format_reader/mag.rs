//! MAG day-block parser
//!
//! A MAG file is a sequence of day blocks. A line containing `/` opens a block
//! and must hold the block's date as `YYYY/MM/DD`; every following line up to
//! the next header carries whitespace-separated readings for that day. The
//! k-th reading of a day (counting across lines) is stamped midnight plus
//! k * 20 seconds.

use super::ReaderOptions;
use super::field_parsers::parse_mag_date;
use super::stats::{ParseResult, ParseStats};
use crate::app::models::Series;
use crate::constants::SAMPLE_INTERVAL_SECS;
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

/// Day block currently being filled
#[derive(Debug)]
struct DayBlock {
    midnight: DateTime<Utc>,
    samples: i64,
}

impl DayBlock {
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let timestamp = self.midnight + Duration::seconds(SAMPLE_INTERVAL_SECS * self.samples);
        self.samples += 1;
        timestamp
    }
}

/// Parse MAG text into a series
pub fn parse_mag(content: &str, source_name: &str, options: &ReaderOptions) -> Result<ParseResult> {
    let mut stats = ParseStats::new();
    let mut timestamps: Vec<DateTime<Utc>> = Vec::new();
    let mut values = Vec::new();
    let mut block: Option<DayBlock> = None;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        stats.lines_read += 1;

        if line.contains('/') {
            if let Some(finished) = &block {
                debug!(
                    "Day block {} closed with {} samples",
                    finished.midnight.date_naive(),
                    finished.samples
                );
            }

            let date = parse_mag_date(line).ok_or_else(|| {
                Error::format(
                    source_name,
                    Some(line_number),
                    format!("invalid date header '{}' (expected YYYY/MM/DD)", line.trim()),
                )
            })?;
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc())
                .ok_or_else(|| {
                    Error::format(source_name, Some(line_number), "date has no midnight")
                })?;

            stats.day_blocks += 1;
            block = Some(DayBlock {
                midnight,
                samples: 0,
            });
            continue;
        }

        let Some(day) = block.as_mut() else {
            if !line.trim().is_empty() {
                stats.skipped_lines += 1;
                debug!("Skipping line {} before first date header", line_number);
            }
            continue;
        };

        for token in line.split_whitespace() {
            let reading = token.parse::<f64>().map_err(|_| {
                Error::format(
                    source_name,
                    Some(line_number),
                    format!("sample '{}' is not a number", token),
                )
            })?;

            let timestamp = day.next_timestamp();
            if let Some(previous) = timestamps.last() {
                if timestamp <= *previous {
                    return Err(Error::format(
                        source_name,
                        Some(line_number),
                        format!(
                            "sample time {} does not follow {}; day blocks overlap or are out of order",
                            timestamp, previous
                        ),
                    ));
                }
            }

            let value = if options.zero_is_missing && reading == 0.0 {
                stats.zero_recoded += 1;
                None
            } else {
                Some(reading)
            };

            timestamps.push(timestamp);
            values.push(value);
        }
    }

    if stats.skipped_lines > 0 {
        warn!(
            "Ignored {} non-blank lines before the first date header in {}",
            stats.skipped_lines, source_name
        );
    }

    let series = Series::new(timestamps, values)
        .map_err(|e| Error::format(source_name, None, e.to_string()))?;

    stats.samples = series.len();
    stats.missing = series.missing_count();

    Ok(ParseResult { series, stats })
}
