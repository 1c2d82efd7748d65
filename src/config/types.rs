//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument
//! parsing and for driving a refresh programmatically.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{COMMERCIAL_CACHE_FILE, LITE_CACHE_FILE};
use crate::error_handling::RefreshError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to
/// most verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Database edition a refresh targets.
///
/// The target selects the origin URL, the local cache file name, and the
/// archive layout the origin serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RefreshTarget {
    /// Free GeoLite2 edition: a gzip-compressed database, no tar layer
    Lite,
    /// Commercial GeoIP2 edition: a gzip-compressed tar archive, requires
    /// a license key
    Commercial,
}

impl RefreshTarget {
    /// Name of the cache file this edition's archive is stored under.
    pub fn cache_file_name(self) -> &'static str {
        match self {
            RefreshTarget::Lite => LITE_CACHE_FILE,
            RefreshTarget::Commercial => COMMERCIAL_CACHE_FILE,
        }
    }

    /// Short human-readable edition name for log messages.
    pub fn edition_name(self) -> &'static str {
        match self {
            RefreshTarget::Lite => "GeoLite2-City",
            RefreshTarget::Commercial => "GeoIP2-City",
        }
    }
}

/// Command-line options for the refresh tool.
#[derive(Debug, Parser)]
#[command(
    name = "ip_location",
    about = "Refreshes the locally cached MaxMind city database"
)]
pub struct Opt {
    /// Database edition to refresh
    #[arg(value_enum)]
    pub target: RefreshTarget,

    /// Directory the downloaded archive is cached in
    /// (defaults to the user cache directory, e.g. ~/.cache)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Directory the extracted database is installed into
    #[arg(long, default_value = ".")]
    pub database_dir: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

/// Library-facing refresh configuration (no CLI dependencies).
///
/// Can be constructed directly when embedding the refresh pipeline, or
/// resolved from CLI options with [`RefreshConfig::from_opt`].
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Database edition to refresh
    pub target: RefreshTarget,
    /// Directory the downloaded archive is cached in
    pub cache_dir: PathBuf,
    /// Directory the extracted database is installed into
    pub database_dir: PathBuf,
}

impl RefreshConfig {
    /// Resolves CLI options into a refresh configuration.
    ///
    /// The cache directory defaults to the platform user cache directory
    /// when `--cache-dir` is not given.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::CacheDirUnavailable`] when no cache directory
    /// was given and the platform does not report one.
    pub fn from_opt(opt: &Opt) -> Result<Self, RefreshError> {
        let cache_dir = match &opt.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir().ok_or(RefreshError::CacheDirUnavailable)?,
        };

        Ok(Self {
            target: opt.target,
            cache_dir,
            database_dir: opt.database_dir.clone(),
        })
    }
}
