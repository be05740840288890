//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use super::app_config::LogLevel;

/// Command-line arguments, overriding the config file where present.
#[derive(Debug, Parser)]
#[command(name = "forkful", version, about = "A lightweight terminal recipe browser")]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Recipe catalog endpoint.
    #[arg(long, env = "FORKFUL_RECIPES_URL")]
    pub recipes_url: Option<String>,

    /// Image cache directory.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Maximum decoded images held in memory.
    #[arg(long)]
    pub memory_capacity: Option<usize>,

    /// Maximum concurrent image downloads.
    #[arg(long)]
    pub max_concurrent_downloads: Option<usize>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}
