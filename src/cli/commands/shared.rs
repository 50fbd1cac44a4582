//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::Result;
use crate::app::models::RepairedSeries;
use crate::app::services::exporter::{self, ExportOptions};
use crate::app::services::format_reader::ReaderOptions;
use crate::app::services::session::Session;
use crate::cli::args::{Args, Commands, InputArgs, OutputArgs};
use crate::config::Config;
use colored::*;
use std::time::Duration;
use tracing::{debug, info};

/// Command statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct CommandStats {
    /// Samples in the loaded series
    pub samples: usize,
    /// Missing samples before any repair
    pub missing_before: usize,
    /// Missing samples that received a value
    pub filled: usize,
    /// Samples still missing after the repair
    pub remaining_missing: usize,
    /// Known readings replaced by the repair
    pub overwritten: usize,
    /// CSV rows written
    pub rows_written: usize,
    /// Total command time
    pub elapsed: Duration,
}

impl CommandStats {
    /// Statistics of a finished repair
    pub fn from_repair(repaired: &RepairedSeries) -> Self {
        Self {
            samples: repaired.len(),
            missing_before: repaired.original().iter().filter(|v| v.is_none()).count(),
            filled: repaired.filled_count(),
            remaining_missing: repaired.remaining_missing(),
            overwritten: repaired.overwritten_count(),
            ..Default::default()
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("magfill={}", log_level)));

    let initialised = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    if initialised.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &Args) -> Result<Config> {
    info!("Loading configuration");

    let config_file = match &args.config_file {
        Some(path) => Some(path.clone()),
        None => Config::default_config_path()
            .ok()
            .filter(|path| path.exists()),
    };

    if let Some(config_path) = &config_file {
        info!("Using config file: {}", config_path.display());
    } else {
        info!("No config file found, using defaults and environment variables");
    }

    let mut config = Config::load_layered(config_file.as_deref())?;
    apply_cli_overrides(&mut config, &args.command);
    config.validate()?;

    Ok(config)
}

/// Apply command-line overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, command: &Commands) {
    let (input, output) = match command {
        Commands::Inspect(args) => (&args.input, None),
        Commands::Interpolate(args) => {
            if let Some(method) = args.method {
                config.interpolation.method = method;
            }
            if let Some(order) = args.order {
                config.interpolation.order = order;
            }
            (&args.input, Some(&args.output))
        }
        Commands::Seasonal(args) => {
            if let Some(period) = args.period {
                config.seasonal.period = period;
            }
            if let Some(start) = &args.start {
                config.seasonal.window_start = start.clone();
            }
            if let Some(end) = &args.end {
                config.seasonal.window_end = end.clone();
            }
            (&args.input, Some(&args.output))
        }
    };

    if input.keep_zeros {
        config.reader.mag_zero_is_missing = false;
    }
    if output.is_some_and(|output| output.include_original) {
        config.export.include_original = true;
    }
}

/// Load the input series of a command
pub fn load_session(input: &InputArgs, config: &Config) -> Result<Session> {
    Session::load(
        &input.input,
        input.file_kind(),
        ReaderOptions::from(&config.reader),
    )
}

/// Write the current repair to the output file, or to stdout when none is given
pub fn write_output(session: &Session, output: &OutputArgs, config: &Config) -> Result<usize> {
    let options = ExportOptions::from(&config.export);
    match &output.output {
        Some(path) => session.export_to_path(path, &options),
        None => match session.current() {
            Some(repaired) => exporter::export(repaired, std::io::stdout().lock(), &options),
            None => Ok(0),
        },
    }
}

/// Print a repair summary; goes to stderr when the CSV itself is on stdout
pub fn print_repair_summary(title: &str, stats: &CommandStats, to_stdout: bool) {
    let mut lines = vec![
        format!("\n{}", title.bright_green().bold()),
        format!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.elapsed.as_millis().to_string().bright_white()
        ),
        format!(
            "  {} {}",
            "Samples:".bright_cyan(),
            stats.samples.to_string().bright_white()
        ),
        format!(
            "  {} {} of {}",
            "Filled:".bright_cyan(),
            stats.filled.to_string().bright_white().bold(),
            stats.missing_before.to_string().bright_white()
        ),
    ];
    if stats.overwritten > 0 {
        lines.push(format!(
            "  {} {}",
            "Overwritten:".bright_cyan(),
            stats.overwritten.to_string().bright_yellow()
        ));
    }
    if stats.remaining_missing > 0 {
        lines.push(format!(
            "  {} {}",
            "Still missing:".bright_red(),
            stats.remaining_missing.to_string().bright_red().bold()
        ));
    }
    lines.push(format!(
        "  {} {}",
        "Rows written:".bright_cyan(),
        stats.rows_written.to_string().bright_white().bold()
    ));

    for line in lines {
        if to_stdout {
            println!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::interpolation::InterpolationMethod;
    use clap::Parser;

    #[test]
    fn test_cli_overrides() {
        let args = Args::try_parse_from([
            "magfill",
            "seasonal",
            "day.mag",
            "--keep-zeros",
            "--period",
            "720",
            "--start",
            "2019-05-23 00:00:00",
            "--end",
            "2019-05-23 01:00:00",
            "--include-original",
        ])
        .unwrap();

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &args.command);

        assert!(!config.reader.mag_zero_is_missing);
        assert_eq!(config.seasonal.period, 720);
        assert_eq!(config.seasonal.window_start, "2019-05-23 00:00:00");
        assert_eq!(config.seasonal.window_end, "2019-05-23 01:00:00");
        assert!(config.export.include_original);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_interpolation_overrides_leave_other_sections() {
        let args = Args::try_parse_from([
            "magfill",
            "interpolate",
            "day.mag",
            "--method",
            "polynomial",
            "--order",
            "2",
        ])
        .unwrap();

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &args.command);

        assert_eq!(config.interpolation.method, InterpolationMethod::Polynomial);
        assert_eq!(config.interpolation.order, 2);
        assert!(config.reader.mag_zero_is_missing);
        assert!(!config.export.include_original);
        assert_eq!(config.seasonal, Config::default().seasonal);
    }

    #[test]
    fn test_command_stats_default() {
        let stats = CommandStats::default();
        assert_eq!(stats.samples, 0);
        assert_eq!(stats.rows_written, 0);
    }
}
