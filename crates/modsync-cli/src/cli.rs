//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

/// modsync - bring an install tree up to the published revision
#[derive(Parser, Debug)]
#[command(name = "modsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub info: LogLevel,

    /// Dry run: log every decision, write nothing
    #[arg(long)]
    pub nomod: bool,

    /// Ignore the revision check and reconcile anyway
    #[arg(long)]
    pub skiprev: bool,

    /// Re-fetch every file, even ones that already match (implies --skiprev)
    #[arg(long)]
    pub force: bool,

    /// Install directory to synchronize
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Base URL or mirror directory of the published tree
    #[arg(long, env = "MODSYNC_SOURCE")]
    pub source: Option<String>,

    /// Settings file (TOML or JSON), instead of <root>/modsync.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-request network timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Values accepted by `--info`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    #[value(alias = "e")]
    Error,
    #[value(alias = "w")]
    Warning,
    #[value(alias = "i")]
    Info,
    #[value(alias = "d")]
    Debug,
}

impl LogLevel {
    pub fn to_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warning => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
        }
    }
}
