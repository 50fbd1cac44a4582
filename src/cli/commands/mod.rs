//! Command implementations for the magfill CLI
//!
//! Each command lives in its own module:
//! - `inspect`: series summary and gap listing
//! - `interpolate`: gap filling by interpolation
//! - `seasonal`: two-pass seasonal reconstruction with a repair window

pub mod inspect;
pub mod interpolate;
pub mod seasonal;
pub mod shared;

pub use shared::CommandStats;

use crate::Result;
use crate::cli::args::{Args, Commands};
use tracing::debug;

/// Main command runner
///
/// Sets up logging, validates the arguments, resolves the layered
/// configuration and dispatches to the subcommand handler.
pub fn run(args: Args) -> Result<CommandStats> {
    shared::setup_logging(&args);
    debug!("Arguments: {:?}", args);

    args.validate()?;
    let config = shared::load_configuration(&args)?;
    let show_summary = args.show_summary();

    match &args.command {
        Commands::Inspect(inspect_args) => inspect::run_inspect(inspect_args, &config, show_summary),
        Commands::Interpolate(interpolate_args) => {
            interpolate::run_interpolate(interpolate_args, &config, show_summary)
        }
        Commands::Seasonal(seasonal_args) => {
            seasonal::run_seasonal(seasonal_args, &config, show_summary)
        }
    }
}
