//! Command-line argument definitions for magfill
//!
//! This module defines the CLI interface using the clap derive API. Global
//! flags (verbosity, config file) apply to every subcommand.

use crate::app::services::format_reader::FileKind;
use crate::app::services::interpolation::InterpolationMethod;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// CLI arguments for the magnetometer gap filler
///
/// Loads geomagnetic sensor readings recorded every 20 seconds, fills the
/// missing samples and writes the repaired series as CSV.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "magfill",
    version,
    about = "Fill gaps in geomagnetic sensor time series (MAG or CSV)",
    long_about = "Loads day-blocked MAG magnetometer files or two-column CSV exports, fills \
                  missing samples by interpolation or by a two-pass seasonal reconstruction, \
                  and exports the repaired series as CSV."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    ///
    /// TOML configuration file with reader, interpolation, seasonal and
    /// export sections. If not specified, looks for magfill/config.toml in
    /// the user config directory.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress output except errors"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Summarise a series: sample count, time range, missing samples and gap runs
    Inspect(InspectArgs),
    /// Fill interior gaps by interpolation
    Interpolate(InterpolateArgs),
    /// Fill gaps by seasonal reconstruction and overwrite the repair window
    Seasonal(SeasonalArgs),
}

/// Input file format as chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Day-blocked MAG magnetometer file
    Mag,
    /// Two-column datetime,value CSV
    Csv,
}

impl From<InputFormat> for FileKind {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Mag => FileKind::Mag,
            InputFormat::Csv => FileKind::Csv,
        }
    }
}

/// Options shared by every command that reads a series
#[derive(Debug, Clone, ClapArgs)]
pub struct InputArgs {
    /// MAG or CSV file to load
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format; guessed from the extension when omitted (.csv is CSV, anything else MAG)
    #[arg(long = "format", value_enum, value_name = "FORMAT")]
    pub format: Option<InputFormat>,

    /// Keep MAG readings of exactly zero instead of treating them as dropouts
    #[arg(long = "keep-zeros")]
    pub keep_zeros: bool,
}

impl InputArgs {
    pub fn file_kind(&self) -> Option<FileKind> {
        self.format.map(FileKind::from)
    }

    fn validate(&self) -> Result<()> {
        if !self.input.is_file() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.input.display()
            )));
        }
        Ok(())
    }
}

/// Options shared by every command that writes a series
#[derive(Debug, Clone, ClapArgs)]
pub struct OutputArgs {
    /// Output CSV file; the series is written to stdout when omitted
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the original channel next to the filled one
    #[arg(long = "include-original")]
    pub include_original: bool,
}

impl OutputArgs {
    fn validate(&self, input: &Path) -> Result<()> {
        if self.output.as_deref() == Some(input) {
            return Err(Error::configuration(format!(
                "Refusing to overwrite the input file {}",
                input.display()
            )));
        }
        Ok(())
    }
}

/// Arguments for the inspect command
#[derive(Debug, Clone, ClapArgs)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// List every gap run instead of the largest ones
    #[arg(long = "all-gaps")]
    pub all_gaps: bool,
}

/// Arguments for the interpolate command
#[derive(Debug, Clone, ClapArgs)]
pub struct InterpolateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Interpolation method (linear, quadratic, cubic, spline, polynomial)
    #[arg(short = 'm', long = "method", value_name = "METHOD")]
    pub method: Option<InterpolationMethod>,

    /// Order for quadratic, cubic, spline and polynomial
    #[arg(long = "order", value_name = "N")]
    pub order: Option<u32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the seasonal command
#[derive(Debug, Clone, ClapArgs)]
pub struct SeasonalArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// First timestamp of the repair window, e.g. "2019-05-23 05:30:00"
    #[arg(long = "start", value_name = "DATETIME")]
    pub start: Option<String>,

    /// Last timestamp of the repair window (inclusive)
    #[arg(long = "end", value_name = "DATETIME")]
    pub end: Option<String>,

    /// Seasonal period in samples (4320 is one day at 20 s)
    #[arg(short = 'p', long = "period", value_name = "SAMPLES")]
    pub period: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inspect(_) => "inspect",
            Self::Interpolate(_) => "interpolate",
            Self::Seasonal(_) => "seasonal",
        }
    }
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check arguments that clap cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        match &self.command {
            Commands::Inspect(args) => args.input.validate(),
            Commands::Interpolate(args) => {
                args.input.validate()?;
                args.output.validate(&args.input.input)?;
                if args.order == Some(0) {
                    return Err(Error::configuration("--order must be positive"));
                }
                Ok(())
            }
            Commands::Seasonal(args) => {
                args.input.validate()?;
                args.output.validate(&args.input.input)?;
                if matches!(args.period, Some(period) if period < 2) {
                    return Err(Error::configuration("--period must be at least 2"));
                }
                Ok(())
            }
        }
    }

    /// Whether human-readable summaries should be printed
    pub fn show_summary(&self) -> bool {
        !self.quiet
    }
}
