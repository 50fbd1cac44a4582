//! Field parsing utilities for MAG and CSV input
//!
//! This module provides helper functions for parsing date headers, flexible
//! datetimes and numeric cells.

use crate::constants::{CSV_DATE_FORMATS, CSV_DATETIME_FORMATS, CSV_MISSING_TOKENS};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::num::ParseFloatError;
use std::sync::LazyLock;

static MAG_DATE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{4})/(\d{1,2})/(\d{1,2})\s*$").expect("MAG date header pattern is valid")
});

/// Parse a MAG date header line (`YYYY/MM/DD`) into a calendar date
pub fn parse_mag_date(line: &str) -> Option<NaiveDate> {
    let captures = MAG_DATE_HEADER.captures(line)?;
    let year = captures[1].parse::<i32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let day = captures[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a datetime in any of the layouts the CSV reader accepts
///
/// Offsets are converted to UTC; naive datetimes are taken to be UTC already.
pub fn parse_flexible_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f %z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    if let Some(naive) = CSV_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(naive.and_utc());
    }

    CSV_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a CSV value cell; recognised missing tokens yield `None`
pub fn parse_value_cell(value: &str) -> Result<Option<f64>, ParseFloatError> {
    let value = value.trim();
    if CSV_MISSING_TOKENS.contains(&value) {
        return Ok(None);
    }
    value.parse::<f64>().map(Some)
}
