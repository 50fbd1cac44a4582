//! Test utilities for format reader testing
//!
//! This module provides sample MAG/CSV content and helper functions used
//! across the reader test modules.

use chrono::{DateTime, TimeZone, Utc};
use std::io::Write;
use tempfile::NamedTempFile;


/// Helper to create a two-day MAG file body
pub fn create_test_mag() -> String {
    "2019/05/23\n\
     49871.2 49871.4 0\n\
     49871.9\n\
     2019/05/24\n\
     49880.0 49880.5\n"
        .to_string()
}

/// Helper to create a small CSV export
pub fn create_test_csv() -> String {
    "datetime,value\n\
     2019-05-23 00:00:00,49871.2\n\
     2019-05-23 00:00:20,\n\
     2019-05-23 00:00:40,0\n\
     2019-05-23 00:01:00,49871.9\n"
        .to_string()
}

/// Helper to create a temporary file with the given content and suffix
pub fn create_temp_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}
