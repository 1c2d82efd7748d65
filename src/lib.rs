//! ip_location library: GeoIP database refresh and lookup
//!
//! This library keeps a locally cached MaxMind city database fresh and
//! resolves IP addresses against it. It has two halves:
//!
//! - The **refresh orchestrator** ([`run_refresh`]) decides whether the
//!   cached archive is stale via a conditional HEAD request, downloads a
//!   fresh copy when needed, extracts the `.mmdb` file from the archive,
//!   validates it, and installs it atomically.
//! - The **lookup service** ([`GeoDatabase`]) opens the installed database
//!   and turns an inbound event carrying an IP address into a formatted
//!   `ip,city,country-subdivision` line.
//!
//! # Example
//!
//! ```no_run
//! use ip_location::{handle_event, GeoDatabase, LookupEvent};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = GeoDatabase::open("GeoLite2-City.mmdb")?;
//! let event: LookupEvent = serde_json::from_str(r#"{"source-ip": "81.2.69.142"}"#)?;
//! let line = handle_event(&db, &event)?;
//! println!("{line}");
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The refresh path requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or call [`run_refresh`] from an async context. Lookups are
//! synchronous and safe to share across threads.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
mod geoip;
pub mod initialization;
mod refresh;

// Re-export public API
pub use config::{LogFormat, LogLevel, Opt, RefreshConfig, RefreshTarget};
pub use error_handling::{InitializationError, LookupError, RefreshError};
pub use geoip::{
    format_line, handle_event, CityRecord, CountryRecord, GeoDatabase, Location, LookupEvent,
    SubdivisionRecord,
};
pub use refresh::{run_refresh, ArchiveLayout, RefreshOutcome, Refresher};
