//! Seasonal command implementation

use super::shared::{CommandStats, load_session, print_repair_summary, write_output};
use crate::Result;
use crate::cli::args::SeasonalArgs;
use crate::config::Config;
use std::time::Instant;
use tracing::info;

/// Reconstruct the input series seasonally and write the result
pub fn run_seasonal(args: &SeasonalArgs, config: &Config, show_summary: bool) -> Result<CommandStats> {
    let start_time = Instant::now();
    let (window_start, window_end) = config.seasonal.window()?;
    let period = config.seasonal.period;

    let mut session = load_session(&args.input, config)?;
    info!(
        "Seasonal reconstruction of {} with period {} samples",
        session.source(),
        period
    );
    let repaired = session.seasonal(window_start, window_end, period)?;
    let mut stats = CommandStats::from_repair(repaired);

    stats.rows_written = write_output(&session, &args.output, config)?;
    stats.elapsed = start_time.elapsed();

    if show_summary {
        print_repair_summary(
            "Seasonal Reconstruction Summary",
            &stats,
            args.output.output.is_some(),
        );
    }
    Ok(stats)
}
