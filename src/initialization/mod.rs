//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources the
//! refresh pipeline needs:
//! - The logger (plain or JSON format)
//! - The HTTP client used for origin requests
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
