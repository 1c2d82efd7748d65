//! GeoIP lookup using the MaxMind city database.
//!
//! This module owns the read side of the system: an explicit database
//! lifecycle object ([`GeoDatabase`]), the decoded record shape
//! ([`Location`]), and the event-to-line handler the serving framework
//! invokes per request.

mod database;
mod handler;
mod location;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export public API
pub use database::GeoDatabase;
pub use handler::{format_line, handle_event, LookupEvent};
pub use location::{CityRecord, CountryRecord, Location, SubdivisionRecord};
