//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (origin URLs, cache names, timeouts, limits)
//! - CLI option types and parsing
//! - The library-facing refresh configuration

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, Opt, RefreshConfig, RefreshTarget};
