//! Conditional freshness check against the origin.
//!
//! The cached archive's modification time carries the origin's last
//! reported `Last-Modified` value, so replaying it in an
//! `If-Modified-Since` HEAD request lets the origin answer 304 when there
//! is nothing new to download.

use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use log::info;
use reqwest::{header, Client, StatusCode};

use crate::config::HTTP_DATE_FORMAT;
use crate::error_handling::RefreshError;

/// Result of the conditional check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Freshness {
    /// The origin confirmed the cached archive is current.
    Fresh,
    /// The cache is missing or the origin has something newer.
    Stale,
}

/// Formats a timestamp as an RFC 1123 HTTP date in GMT.
pub(crate) fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Parses an HTTP date header value (RFC 1123, GMT) into a UTC timestamp.
pub(crate) fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Decides whether the cached archive needs replacing.
///
/// No cache file means unconditionally stale, with no request issued. With
/// a cache file present its modification time is replayed to the origin;
/// 304 means fresh, 401 is fatal (bad credential), anything else is stale.
/// A transport failure is fatal: freshness cannot safely be assumed.
pub(crate) async fn check(
    client: &Client,
    url: &str,
    cache_file: &Path,
) -> Result<Freshness, RefreshError> {
    let modified = match std::fs::metadata(cache_file) {
        Ok(metadata) => metadata.modified().map_err(|source| RefreshError::CacheIo {
            path: cache_file.to_path_buf(),
            source,
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No cached archive found at {}", cache_file.display());
            return Ok(Freshness::Stale);
        }
        Err(source) => {
            return Err(RefreshError::CacheIo {
                path: cache_file.to_path_buf(),
                source,
            })
        }
    };

    let response = client
        .head(url)
        .header(header::IF_MODIFIED_SINCE, http_date(modified))
        .send()
        .await
        .map_err(RefreshError::FreshnessCheck)?;

    match response.status() {
        StatusCode::NOT_MODIFIED => {
            info!("Cached archive is up to date - skipping download");
            Ok(Freshness::Fresh)
        }
        StatusCode::UNAUTHORIZED => Err(RefreshError::Unauthorized("HEAD")),
        _ => {
            info!("Cached archive is present but no longer current");
            Ok(Freshness::Stale)
        }
    }
}
