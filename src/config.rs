//! Configuration management and validation.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables, then command-line flags (applied by the CLI).
//!
//! ```toml
//! [reader]
//! mag_zero_is_missing = true
//!
//! [interpolation]
//! method = "spline"
//! order = 3
//!
//! [seasonal]
//! period = 4320
//! window_start = "2019-05-23 05:30:00"
//! window_end = "2019-05-25 06:24:30"
//!
//! [export]
//! include_original = false
//! ```

use crate::app::services::format_reader::field_parsers::parse_flexible_datetime;
use crate::app::services::interpolation::InterpolationMethod;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_INTERPOLATION_ORDER, DEFAULT_SEASONAL_PERIOD,
    DEFAULT_WINDOW_END, DEFAULT_WINDOW_START, ENV_INTERPOLATION_METHOD, ENV_SEASONAL_PERIOD,
    EXPORT_DATETIME_FORMAT,
};
use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// How raw input files are interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Treat a MAG reading of exactly zero as a sensor dropout
    pub mag_zero_is_missing: bool,

    /// First CSV row is a header
    pub csv_has_header: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            mag_zero_is_missing: true,
            csv_has_header: true,
        }
    }
}

/// Defaults for the interpolation command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    pub method: InterpolationMethod,

    /// Order passed to order-requiring methods
    pub order: u32,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::Linear,
            order: DEFAULT_INTERPOLATION_ORDER,
        }
    }
}

/// Seasonal reconstruction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalConfig {
    /// Seasonal period in samples
    pub period: usize,

    /// First timestamp of the forced repair window
    pub window_start: String,

    /// Last timestamp of the forced repair window (inclusive)
    pub window_end: String,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_SEASONAL_PERIOD,
            window_start: DEFAULT_WINDOW_START.to_string(),
            window_end: DEFAULT_WINDOW_END.to_string(),
        }
    }
}

impl SeasonalConfig {
    /// Parse the window bounds into UTC timestamps
    pub fn window(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let start = parse_window_bound("window_start", &self.window_start)?;
        let end = parse_window_bound("window_end", &self.window_end)?;
        Ok((start, end))
    }
}

fn parse_window_bound(field: &str, value: &str) -> Result<DateTime<Utc>> {
    parse_flexible_datetime(value).ok_or_else(|| {
        Error::configuration(format!("seasonal.{} '{}' is not a valid datetime", field, value))
    })
}

/// CSV export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the original channel next to the filled one
    pub include_original: bool,

    /// strftime layout of the datetime column
    pub datetime_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_original: false,
            datetime_format: EXPORT_DATETIME_FORMAT.to_string(),
        }
    }
}

/// Global configuration for magfill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reader: ReaderConfig,
    pub interpolation: InterpolationConfig,
    pub seasonal: SeasonalConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Default location of the configuration file
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine the user config directory"))
    }

    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        Self::from_toml_str(&content).map_err(|e| {
            Error::configuration(format!("{} ({})", e, path.display()))
        })
    }

    /// Defaults, then `config_file` if given, then environment overrides
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SEASONAL_PERIOD) {
            self.seasonal.period = value.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_SEASONAL_PERIOD, value
                ))
            })?;
            debug!("Seasonal period from environment: {}", self.seasonal.period);
        }

        if let Some(value) = lookup(ENV_INTERPOLATION_METHOD) {
            self.interpolation.method = value
                .parse()
                .map_err(|e| Error::configuration(format!("{}: {}", ENV_INTERPOLATION_METHOD, e)))?;
            debug!(
                "Interpolation method from environment: {}",
                self.interpolation.method
            );
        }

        Ok(())
    }

    /// Check the configuration for values no operation could run with
    pub fn validate(&self) -> Result<()> {
        if self.seasonal.period < 2 {
            return Err(Error::configuration(format!(
                "seasonal.period must be at least 2, got {}",
                self.seasonal.period
            )));
        }

        let (start, end) = self.seasonal.window()?;
        if start > end {
            return Err(Error::configuration(format!(
                "seasonal window start {} is after its end {}",
                start, end
            )));
        }

        if self.interpolation.order == 0 {
            return Err(Error::configuration("interpolation.order must be positive"));
        }

        let format = &self.export.datetime_format;
        if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::configuration(format!(
                "export.datetime_format '{}' is not a valid strftime layout",
                format
            )));
        }

        Ok(())
    }

    pub fn with_interpolation(mut self, method: InterpolationMethod, order: u32) -> Self {
        self.interpolation.method = method;
        self.interpolation.order = order;
        self
    }

    pub fn with_period(mut self, period: usize) -> Self {
        self.seasonal.period = period;
        self
    }

    /// Set the repair window bounds (any format the CSV reader accepts)
    pub fn with_window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.seasonal.window_start = start.into();
        self.seasonal.window_end = end.into();
        self
    }

    pub fn with_original_column(mut self) -> Self {
        self.export.include_original = true;
        self
    }
}
