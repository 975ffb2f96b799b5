//! modsync command-line updater
//!
//! Fetches the published manifest, and when its revision is newer than the
//! one recorded under `--root`, brings every listed file up to date.

mod cli;
mod error;
mod logging;
mod update;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::Result;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.info)?;
    tracing::debug!(root = %cli.root.display(), "Starting update");
    update::run_update(&cli)
}
