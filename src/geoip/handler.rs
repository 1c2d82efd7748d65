//! Event-to-line lookup handling.
//!
//! The serving framework deserializes each inbound event and calls
//! [`handle_event`] with the process-lifetime database. The output is a
//! single comma-joined line: input IP, English city name, full ISO code.

use std::net::IpAddr;

use serde::Deserialize;

use crate::error_handling::LookupError;
use crate::geoip::{GeoDatabase, Location};

/// Inbound lookup event.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupEvent {
    /// Source IP address text to resolve.
    #[serde(rename = "source-ip")]
    pub source_ip: String,
}

/// Resolves one event against the database and renders the output line.
///
/// # Errors
///
/// [`LookupError::InvalidIp`] when the event's address text is not an IPv4
/// or IPv6 literal (a client error); [`LookupError::Database`] when the
/// query fails. An address with no record is not an error and renders with
/// blank fields.
pub fn handle_event(database: &GeoDatabase, event: &LookupEvent) -> Result<String, LookupError> {
    let ip: IpAddr = event
        .source_ip
        .parse()
        .map_err(|source| LookupError::InvalidIp {
            input: event.source_ip.clone(),
            source,
        })?;

    let location = database.lookup(ip)?;
    Ok(format_line(&event.source_ip, &location))
}

/// Renders the output line for a lookup.
///
/// Exactly three comma-joined fields: the original input text, the
/// English-locale city name (empty when absent), and the full ISO code.
/// Embedded commas are not quoted or escaped; the line format has no
/// escape mechanism.
pub fn format_line(ip_text: &str, location: &Location) -> String {
    let full_iso = location.full_iso();
    [ip_text, location.city_name("en"), full_iso.as_str()].join(",")
}
