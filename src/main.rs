//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ip_location` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All refresh logic is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ip_location::initialization::init_logger_with;
use ip_location::{run_refresh, Opt, RefreshConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting MAXMIND_LICENSE in .env without exporting it manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = match RefreshConfig::from_opt(&opt) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ip_location error: {e}");
            process::exit(1);
        }
    };

    match run_refresh(config).await {
        Ok(outcome) => {
            println!(
                "✅ {} ({}) is ready at {}",
                outcome
                    .database_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "database".to_string()),
                if outcome.downloaded {
                    "downloaded from origin"
                } else {
                    "cache was fresh"
                },
                outcome.database_path.display()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("ip_location error: {e:#}");
            process::exit(1);
        }
    }
}
