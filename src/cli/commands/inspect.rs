//! Inspect command implementation
//!
//! Loads a series and reports its shape without repairing anything.

use super::shared::{CommandStats, load_session};
use crate::Result;
use crate::app::models::{GapKind, GapRun, Series};
use crate::cli::args::InspectArgs;
use crate::config::Config;
use crate::constants::SAMPLE_INTERVAL_SECS;
use colored::*;
use std::time::Instant;
use tracing::info;

/// Gap runs listed when `--all-gaps` is not given
const LARGEST_GAPS_SHOWN: usize = 10;

pub fn run_inspect(args: &InspectArgs, config: &Config, show_summary: bool) -> Result<CommandStats> {
    let start_time = Instant::now();
    let session = load_session(&args.input, config)?;
    let series = session.original();

    let gaps = series.gap_runs();
    info!(
        "{}: {} samples, {} missing in {} gap runs",
        session.source(),
        series.len(),
        series.missing_count(),
        gaps.len()
    );

    if show_summary {
        print_overview(session.source(), series);
        if let Some(stats) = session.stats() {
            println!(
                "  {} {} lines, {} day blocks, {} zero readings recoded, {} lines skipped",
                "Parsed:".bright_cyan(),
                stats.lines_read,
                stats.day_blocks,
                stats.zero_recoded,
                stats.skipped_lines
            );
            println!(
                "  {} {:.2}%",
                "Coverage:".bright_cyan(),
                stats.coverage()
            );
        }
        print_gaps(series, &gaps, args.all_gaps);
    }

    Ok(CommandStats {
        samples: series.len(),
        missing_before: series.missing_count(),
        remaining_missing: series.missing_count(),
        elapsed: start_time.elapsed(),
        ..Default::default()
    })
}

fn print_overview(source: &str, series: &Series) {
    println!("\n{}", source.bright_green().bold());
    println!(
        "  {} {}",
        "Samples:".bright_cyan(),
        series.len().to_string().bright_white().bold()
    );
    if let (Some(first), Some(last)) = (series.first_timestamp(), series.last_timestamp()) {
        println!("  {} {} .. {}", "Range:".bright_cyan(), first, last);
    }
    println!(
        "  {} {}",
        "Missing:".bright_cyan(),
        series.missing_count().to_string().bright_white()
    );
    if let Some(mean) = series.known_mean() {
        println!("  {} {:.3}", "Mean:".bright_cyan(), mean);
    }
}

fn print_gaps(series: &Series, gaps: &[GapRun], all: bool) {
    if gaps.is_empty() {
        println!("  {}", "No gaps".bright_green());
        return;
    }

    let mut shown: Vec<&GapRun> = gaps.iter().collect();
    if !all {
        shown.sort_by(|a, b| b.len.cmp(&a.len).then(a.start.cmp(&b.start)));
        shown.truncate(LARGEST_GAPS_SHOWN);
        shown.sort_by_key(|gap| gap.start);
    }

    println!(
        "  {} {} ({} shown)",
        "Gap runs:".bright_cyan(),
        gaps.len().to_string().bright_white(),
        shown.len()
    );
    for gap in shown {
        let kind = match gap.kind {
            GapKind::Leading => "leading".bright_yellow(),
            GapKind::Interior => "interior".normal(),
            GapKind::Trailing => "trailing".bright_yellow(),
            GapKind::Whole => "whole series".bright_red(),
        };
        println!(
            "    {} +{} samples ({}s) {}",
            series.timestamps()[gap.start],
            gap.len,
            gap.len as i64 * SAMPLE_INTERVAL_SECS,
            kind
        );
    }
}
