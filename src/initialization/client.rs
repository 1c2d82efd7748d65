//! HTTP client initialization.

use reqwest::ClientBuilder;

use crate::config::ARCHIVE_DOWNLOAD_TIMEOUT;

/// Initializes the HTTP client used for origin requests.
///
/// Creates a `reqwest::Client` with an overall request timeout sized for
/// database archive downloads. Both the conditional HEAD check and the GET
/// download go through this client.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new().timeout(ARCHIVE_DOWNLOAD_TIMEOUT).build()
}
