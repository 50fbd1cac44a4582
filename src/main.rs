use anyhow::Context;
use clap::Parser;
use magfill::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();
    let command = args.command.name();

    let result = commands::run(args).with_context(|| format!("magfill {} failed", command));

    match result {
        Ok(_stats) => {
            // Summaries have already been printed by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
