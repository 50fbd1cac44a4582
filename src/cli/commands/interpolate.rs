//! Interpolate command implementation

use super::shared::{CommandStats, load_session, print_repair_summary, write_output};
use crate::Result;
use crate::cli::args::InterpolateArgs;
use crate::config::Config;
use std::time::Instant;
use tracing::{debug, info};

/// Fill interior gaps of the input series and write the result
pub fn run_interpolate(
    args: &InterpolateArgs,
    config: &Config,
    show_summary: bool,
) -> Result<CommandStats> {
    let start_time = Instant::now();
    let method = config.interpolation.method;
    let order = method.uses_order().then_some(config.interpolation.order);
    debug!("Interpolation arguments: {:?}", args);

    let mut session = load_session(&args.input, config)?;
    let repaired = session.interpolate(method, order)?;
    let mut stats = CommandStats::from_repair(repaired);
    info!("Applied {}", repaired.method());

    stats.rows_written = write_output(&session, &args.output, config)?;
    stats.elapsed = start_time.elapsed();

    if show_summary {
        let title = format!("Interpolation Summary ({})", method);
        print_repair_summary(&title, &stats, args.output.output.is_some());
    }
    Ok(stats)
}
