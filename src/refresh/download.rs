//! Archive download and freshness anchoring.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use log::{info, warn};
use reqwest::{header, Client, StatusCode};

use crate::config::MAX_ARCHIVE_DOWNLOAD_SIZE;
use crate::error_handling::RefreshError;
use crate::refresh::freshness::parse_http_date;

/// Downloads the archive and overwrites the cache file with it.
///
/// After a successful write the origin's `Last-Modified` header, when
/// parseable, is stamped onto the cache file's modification time -- that
/// stamp is what the next freshness check replays. A missing or unparsable
/// header is not fatal: the file keeps its natural write time and the next
/// conditional check degrades to an approximate comparison, which is
/// logged as the degraded state it is.
///
/// Returns the anchored origin timestamp, or `None` when the anchor could
/// not be established.
pub(crate) async fn fetch_archive(
    client: &Client,
    url: &str,
    cache_file: &Path,
) -> Result<Option<DateTime<Utc>>, RefreshError> {
    let response = client.get(url).send().await.map_err(RefreshError::Download)?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(RefreshError::Unauthorized("GET"));
    }
    if !status.is_success() {
        return Err(RefreshError::OriginStatus(status));
    }

    if let Some(length) = response.content_length() {
        if length > MAX_ARCHIVE_DOWNLOAD_SIZE as u64 {
            return Err(RefreshError::OversizedDownload {
                size: length,
                max: MAX_ARCHIVE_DOWNLOAD_SIZE as u64,
            });
        }
    }

    // Capture the header before the body consumes the response
    let last_modified = response
        .headers()
        .get(header::LAST_MODIFIED)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let bytes = response.bytes().await.map_err(RefreshError::Download)?;
    // Content-Length can be absent or wrong; check what actually arrived
    if bytes.len() > MAX_ARCHIVE_DOWNLOAD_SIZE {
        return Err(RefreshError::OversizedDownload {
            size: bytes.len() as u64,
            max: MAX_ARCHIVE_DOWNLOAD_SIZE as u64,
        });
    }

    tokio::fs::write(cache_file, &bytes)
        .await
        .map_err(|source| RefreshError::CacheIo {
            path: cache_file.to_path_buf(),
            source,
        })?;
    info!(
        "Downloaded {} bytes to {}",
        bytes.len(),
        cache_file.display()
    );

    let anchor = match last_modified.as_deref() {
        Some(header_value) => match parse_http_date(header_value) {
            Some(origin_modified) => match set_file_modified(cache_file, origin_modified) {
                Ok(()) => {
                    info!("Anchored cache timestamp to origin Last-Modified: {header_value}");
                    Some(origin_modified)
                }
                Err(e) => {
                    warn!(
                        "Could not stamp the cache with the origin Last-Modified ({e}); \
                         the next freshness check will be approximate"
                    );
                    None
                }
            },
            None => {
                warn!(
                    "Origin Last-Modified header {header_value:?} did not parse; the cache \
                     keeps its local write time and the next freshness check will be approximate"
                );
                None
            }
        },
        None => {
            warn!(
                "Origin supplied no Last-Modified header; the cache keeps its local write \
                 time and the next freshness check will be approximate"
            );
            None
        }
    };

    Ok(anchor)
}

fn set_file_modified(path: &Path, when: DateTime<Utc>) -> std::io::Result<()> {
    let file = std::fs::File::options().write(true).open(path)?;
    file.set_modified(SystemTime::from(when))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use std::time::Duration;
    use tempfile::TempDir;

    const LAST_MODIFIED: &str = "Wed, 21 Oct 2015 07:28:00 GMT";

    fn anchored_instant() -> SystemTime {
        SystemTime::from(parse_http_date(LAST_MODIFIED).expect("fixture date parses"))
    }

    #[tokio::test]
    async fn test_download_overwrites_cache_and_anchors_mtime() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/db.gz")).respond_with(
                status_code(200)
                    .append_header("Last-Modified", LAST_MODIFIED)
                    .body("fresh archive bytes"),
            ),
        );

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache_file = temp_dir.path().join("geolite.gz");
        std::fs::write(&cache_file, b"previous archive").expect("Failed to seed cache");

        let client = reqwest::Client::new();
        let anchor = fetch_archive(&client, &server.url("/db.gz").to_string(), &cache_file)
            .await
            .expect("download succeeds");

        assert_eq!(
            anchor,
            parse_http_date(LAST_MODIFIED),
            "anchor reports the origin timestamp"
        );
        let bytes = std::fs::read(&cache_file).expect("cache readable");
        assert_eq!(bytes, b"fresh archive bytes");

        // The stored mtime is the origin's Last-Modified, not the wall clock
        let modified = std::fs::metadata(&cache_file)
            .and_then(|m| m.modified())
            .expect("cache mtime");
        let drift = modified
            .duration_since(anchored_instant())
            .unwrap_or_else(|e| e.duration());
        assert!(drift < Duration::from_secs(1), "mtime drifted by {drift:?}");
    }

    #[tokio::test]
    async fn test_download_without_last_modified_keeps_write_time() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/db.gz"))
                .respond_with(status_code(200).body("archive")),
        );

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache_file = temp_dir.path().join("geolite.gz");

        // Margin absorbs coarse filesystem mtime granularity
        let before = SystemTime::now() - Duration::from_secs(2);
        let client = reqwest::Client::new();
        let anchor = fetch_archive(&client, &server.url("/db.gz").to_string(), &cache_file)
            .await
            .expect("missing header is non-fatal");

        assert_eq!(anchor, None, "no anchor without the header");
        let modified = std::fs::metadata(&cache_file)
            .and_then(|m| m.modified())
            .expect("cache mtime");
        assert!(modified >= before, "file keeps its natural write time");
    }

    #[tokio::test]
    async fn test_download_with_unparsable_last_modified_degrades() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/db.gz")).respond_with(
                status_code(200)
                    .append_header("Last-Modified", "half past never")
                    .body("archive"),
            ),
        );

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache_file = temp_dir.path().join("geolite.gz");

        let client = reqwest::Client::new();
        let anchor = fetch_archive(&client, &server.url("/db.gz").to_string(), &cache_file)
            .await
            .expect("unparsable header is non-fatal");

        assert_eq!(anchor, None);
        assert_eq!(
            std::fs::read(&cache_file).expect("cache readable"),
            b"archive",
            "the archive is still written"
        );
    }

    #[tokio::test]
    async fn test_download_401_is_fatal() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/db.gz"))
                .respond_with(status_code(401)),
        );

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache_file = temp_dir.path().join("geoip.tar.gz");

        let client = reqwest::Client::new();
        let err = fetch_archive(&client, &server.url("/db.gz").to_string(), &cache_file)
            .await
            .expect_err("401 is fatal");
        assert!(matches!(err, RefreshError::Unauthorized("GET")));
        assert!(!cache_file.exists(), "nothing is written on a 401");
    }

    #[tokio::test]
    async fn test_download_server_error_is_fatal() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/db.gz"))
                .respond_with(status_code(500)),
        );

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache_file = temp_dir.path().join("geolite.gz");

        let client = reqwest::Client::new();
        let err = fetch_archive(&client, &server.url("/db.gz").to_string(), &cache_file)
            .await
            .expect_err("5xx fails the refresh");
        assert!(matches!(
            err,
            RefreshError::OriginStatus(StatusCode::INTERNAL_SERVER_ERROR)
        ));
    }
}
