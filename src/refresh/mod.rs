//! The refresh pipeline.
//!
//! A refresh run is strictly sequential: decide freshness with a
//! conditional HEAD, download when stale, extract the database from the
//! cached archive, validate it, and atomically install it. Every failure
//! aborts the run with a typed [`RefreshError`]; there are no retries here
//! -- whatever schedules the refresh owns retry policy.
//!
//! Extraction and validation run on every refresh, including runs where
//! the cache was already fresh, so a refresh always ends with a database
//! that was just proven loadable.

mod download;
mod extract;
mod freshness;

pub use extract::ArchiveLayout;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use url::form_urlencoded;

use crate::config::{
    RefreshConfig, RefreshTarget, COMMERCIAL_DOWNLOAD_URL, GEOLITE_DOWNLOAD_URL, LICENSE_KEY_ENV,
};
use crate::error_handling::RefreshError;
use crate::geoip::GeoDatabase;
use crate::initialization::init_client;
use crate::refresh::extract::ExtractedDatabase;
use crate::refresh::freshness::Freshness;

/// Result of a successful refresh run.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Path the validated database was installed at.
    pub database_path: PathBuf,
    /// Whether a download happened (`false`: the cache was fresh).
    pub downloaded: bool,
    /// The origin `Last-Modified` instant the cache was anchored to.
    /// `None` after a download means the anchor could not be established
    /// and the next freshness check degrades to an approximate comparison.
    pub origin_modified: Option<DateTime<Utc>>,
    /// Build epoch of the installed database.
    pub build_epoch: u64,
}

/// One configured refresh run.
///
/// Built from a [`RefreshConfig`]; the commercial license precondition is
/// checked at construction time, before any network activity.
pub struct Refresher {
    client: reqwest::Client,
    origin_url: String,
    edition: &'static str,
    cache_file: PathBuf,
    database_dir: PathBuf,
    layout: ArchiveLayout,
}

impl Refresher {
    /// Builds a refresher for the configured target.
    ///
    /// # Errors
    ///
    /// [`RefreshError::MissingLicense`] when the commercial edition is
    /// requested without `MAXMIND_LICENSE` in the environment;
    /// [`RefreshError::HttpClient`] when the HTTP client cannot be built.
    pub fn new(config: &RefreshConfig) -> Result<Self, RefreshError> {
        // Precondition first: a missing license must fail before any
        // network-facing resource exists.
        let origin_url = origin_url_for(config.target)?;
        let client = init_client().map_err(RefreshError::HttpClient)?;

        Ok(Self {
            client,
            origin_url,
            edition: config.target.edition_name(),
            cache_file: config.cache_dir.join(config.target.cache_file_name()),
            database_dir: config.database_dir.clone(),
            layout: ArchiveLayout::for_target(config.target),
        })
    }

    /// Replaces the origin URL, e.g. to point at a mirror.
    pub fn with_origin_url(mut self, url: impl Into<String>) -> Self {
        self.origin_url = url.into();
        self
    }

    /// Path of the cached archive this refresher maintains.
    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// Runs the refresh to completion.
    pub async fn run(&self) -> Result<RefreshOutcome, RefreshError> {
        if let Some(cache_dir) = self.cache_file.parent() {
            tokio::fs::create_dir_all(cache_dir)
                .await
                .map_err(|source| RefreshError::CacheIo {
                    path: cache_dir.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::create_dir_all(&self.database_dir)
            .await
            .map_err(|source| RefreshError::InstallIo {
                path: self.database_dir.clone(),
                source,
            })?;

        let freshness =
            freshness::check(&self.client, &self.origin_url, &self.cache_file).await?;
        let (downloaded, origin_modified) = match freshness {
            Freshness::Fresh => (false, None),
            Freshness::Stale => {
                info!("Downloading the {} archive from the origin", self.edition);
                let anchor =
                    download::fetch_archive(&self.client, &self.origin_url, &self.cache_file)
                        .await?;
                (true, anchor)
            }
        };

        let archive =
            tokio::fs::read(&self.cache_file)
                .await
                .map_err(|source| RefreshError::CacheIo {
                    path: self.cache_file.clone(),
                    source,
                })?;
        let extracted = extract::extract_archive(&archive, self.layout)?;
        let (database_path, build_epoch) = self.install(extracted).await?;

        Ok(RefreshOutcome {
            database_path,
            downloaded,
            origin_modified,
            build_epoch,
        })
    }

    /// Validates the extracted bytes and installs them atomically.
    ///
    /// The bytes are staged next to the final path, read back in full and
    /// parsed, and only then renamed into place. A failed validation never
    /// touches a previously installed database.
    async fn install(&self, extracted: ExtractedDatabase) -> Result<(PathBuf, u64), RefreshError> {
        let final_path = self.database_dir.join(&extracted.name);
        let staging_path = self.database_dir.join(format!("{}.tmp", extracted.name));

        tokio::fs::write(&staging_path, &extracted.bytes)
            .await
            .map_err(|source| RefreshError::InstallIo {
                path: staging_path.clone(),
                source,
            })?;

        // Validate the staged file as written, not the bytes in memory
        let staged =
            tokio::fs::read(&staging_path)
                .await
                .map_err(|source| RefreshError::InstallIo {
                    path: staging_path.clone(),
                    source,
                })?;
        let database = match GeoDatabase::from_bytes(staged) {
            Ok(database) => database,
            Err(e) => {
                let _ = tokio::fs::remove_file(&staging_path).await;
                return Err(RefreshError::Validation(e));
            }
        };
        let build_epoch = database.build_epoch();

        tokio::fs::rename(&staging_path, &final_path)
            .await
            .map_err(|source| RefreshError::InstallIo {
                path: final_path.clone(),
                source,
            })?;
        info!(
            "Validated database (build epoch {build_epoch}), installed at {}",
            final_path.display()
        );

        Ok((final_path, build_epoch))
    }
}

/// Runs a refresh for the configured target.
///
/// This is the main entry point for the refresh side of the library. See
/// [`Refresher`] for the pipeline it drives.
pub async fn run_refresh(config: RefreshConfig) -> Result<RefreshOutcome, RefreshError> {
    Refresher::new(&config)?.run().await
}

/// Resolves the origin URL for a target.
///
/// The commercial URL carries the percent-encoded license key from the
/// environment; a missing or empty key fails here, before any request.
fn origin_url_for(target: RefreshTarget) -> Result<String, RefreshError> {
    match target {
        RefreshTarget::Lite => Ok(GEOLITE_DOWNLOAD_URL.to_string()),
        RefreshTarget::Commercial => {
            let license = std::env::var(LICENSE_KEY_ENV).unwrap_or_default();
            if license.is_empty() {
                return Err(RefreshError::MissingLicense(LICENSE_KEY_ENV));
            }
            let encoded: String = form_urlencoded::byte_serialize(license.as_bytes()).collect();
            Ok(format!("{COMMERCIAL_DOWNLOAD_URL}{encoded}"))
        }
    }
}
