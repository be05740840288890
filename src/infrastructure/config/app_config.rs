//! Application configuration, loaded from a TOML file and CLI arguments.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::infrastructure::http::DEFAULT_RECIPES_URL;
use crate::infrastructure::image::memory_store::DEFAULT_MEMORY_CAPACITY;

use super::args::CliArgs;

const APP_NAME: &str = "forkful";
const APP_QUALIFIER: &str = "dev";
const APP_ORGANIZATION: &str = "forkful";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recipe catalog endpoint.
    #[serde(default = "default_recipes_url")]
    pub recipes_url: String,

    /// Image cache directory override.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Maximum decoded images held in memory.
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,

    /// Maximum concurrent image downloads.
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Loads configuration from `path`, or defaults if the file is absent.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path);

        match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
                toml::from_str(&contents)
                    .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(recipes_url) = &args.recipes_url {
            self.recipes_url.clone_from(recipes_url);
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache_dir = Some(cache_dir.clone());
        }
        if let Some(memory_capacity) = args.memory_capacity {
            self.memory_capacity = memory_capacity;
        }
        if let Some(max_concurrent) = args.max_concurrent_downloads {
            self.max_concurrent_downloads = max_concurrent;
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
    }

    /// Returns the default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Returns the effective image cache directory.
    #[must_use]
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
                || std::env::temp_dir().join(APP_NAME).join("images"),
                |dirs| dirs.cache_dir().join("images"),
            )
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recipes_url: default_recipes_url(),
            cache_dir: None,
            memory_capacity: default_memory_capacity(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
            timeout_secs: default_timeout_secs(),
            log_level: LogLevel::default(),
        }
    }
}

/// Errors loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {0}: {1}")]
    Read(String, String),
    /// The file could not be parsed as TOML.
    #[error("failed to parse config {0}: {1}")]
    Parse(String, String),
}

fn default_recipes_url() -> String {
    DEFAULT_RECIPES_URL.to_string()
}

fn default_memory_capacity() -> usize {
    DEFAULT_MEMORY_CAPACITY
}

fn default_max_concurrent_downloads() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}
