//! Error type definitions.
//!
//! This module defines all error types used throughout the application.
//! Refresh errors fall into the taxonomy the tool's callers care about:
//! precondition failures happen before any network activity, transport
//! failures abort the refresh, and format failures mean the fetched
//! artifact was unusable. There is no retry anywhere in here -- retry
//! policy belongs to whatever schedules the refresh.

use std::io;
use std::net::AddrParseError;
use std::path::PathBuf;

use log::SetLoggerError;
use maxminddb::MaxMindDbError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Error types for the refresh pipeline.
///
/// Every variant aborts the refresh; none of them is retried internally.
#[derive(Error, Debug)]
pub enum RefreshError {
    // Precondition errors: no network activity has happened yet.
    /// The commercial edition was requested without a license key in the
    /// environment.
    #[error("{0} is not set (required for the commercial edition)")]
    MissingLicense(&'static str),

    /// No cache directory was configured and the platform does not report
    /// a user cache directory.
    #[error("could not determine a cache directory for this platform")]
    CacheDirUnavailable,

    /// The HTTP client could not be constructed.
    #[error("HTTP client initialization error: {0}")]
    HttpClient(#[source] reqwest::Error),

    // Transport errors.
    /// The conditional HEAD request failed at the transport level. The
    /// cache cannot safely be assumed fresh, so the refresh aborts.
    #[error("freshness check against the origin failed: {0}")]
    FreshnessCheck(#[source] reqwest::Error),

    /// The archive download failed at the transport level.
    #[error("archive download failed: {0}")]
    Download(#[source] reqwest::Error),

    /// The origin rejected the request with 401 Unauthorized: the license
    /// key is missing, expired, or wrong.
    #[error("origin returned 401 Unauthorized for the {0} request")]
    Unauthorized(&'static str),

    /// The origin answered the download with a non-success status.
    #[error("origin returned unexpected status {0} for the download")]
    OriginStatus(reqwest::StatusCode),

    /// The origin response exceeded the configured size ceiling.
    #[error("archive download too large: {size} bytes (max: {max} bytes)")]
    OversizedDownload {
        /// Reported or observed response size in bytes
        size: u64,
        /// Configured ceiling in bytes
        max: u64,
    },

    // Local IO errors.
    /// Reading or writing the cached archive failed.
    #[error("cache file error at {}: {source}", .path.display())]
    CacheIo {
        /// Cache file the operation targeted
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// Writing, reading back, or renaming the extracted database failed.
    #[error("database install error at {}: {source}", .path.display())]
    InstallIo {
        /// Database path the operation targeted
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    // Format errors: the fetched artifact is corrupt or not what the
    // target promised.
    /// The archive is not valid gzip data.
    #[error("failed to decompress archive: {0}")]
    Decompress(#[source] io::Error),

    /// Walking the tar stream inside the archive failed.
    #[error("failed to read tar archive: {0}")]
    ArchiveRead(#[source] io::Error),

    /// The tar stream ended without a `.mmdb` entry.
    #[error("no .mmdb entry found in archive")]
    DatabaseEntryMissing,

    /// The extracted file does not parse as a lookup database. A refresh
    /// that extracts but does not yield a loadable database is a failure,
    /// never a silent success.
    #[error("extracted database failed validation: {0}")]
    Validation(#[source] MaxMindDbError),
}

/// Error types for the lookup service.
///
/// The three variants are deliberately distinguishable so callers can tell
/// "this request was malformed" from "try again after a refresh" from
/// "the database itself misbehaved".
#[derive(Error, Debug)]
pub enum LookupError {
    /// The inbound IP text did not parse as an IPv4 or IPv6 literal.
    /// A client-input error, not a database error.
    #[error("invalid IP address {input:?}: {source}")]
    InvalidIp {
        /// The text that failed to parse
        input: String,
        /// Underlying parse error
        source: AddrParseError,
    },

    /// The database file could not be read -- typically it has not been
    /// provisioned by a refresh yet. A service-unavailable condition.
    #[error("geolocation database unavailable at {}: {source}", .path.display())]
    Unavailable {
        /// Database path that could not be read
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// The database failed to parse or the query itself failed. An
    /// internal error.
    #[error("geolocation database error: {0}")]
    Database(#[from] MaxMindDbError),
}
