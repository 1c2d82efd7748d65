//! Database lifecycle and per-address lookups.

use std::net::IpAddr;
use std::path::Path;

use log::trace;
use maxminddb::{MaxMindDbError, Reader};

use crate::error_handling::LookupError;
use crate::geoip::Location;

/// An opened city database.
///
/// Owns an immutable in-memory reader over the database bytes. Construct
/// one at service start (or lazily, memoized) and share it by reference or
/// `Arc`; lookups take `&self` and the underlying format is safe for
/// concurrent read-only access. Dropping the value releases the bytes.
pub struct GeoDatabase {
    reader: Reader<Vec<u8>>,
}

impl GeoDatabase {
    /// Opens the database at `path`, reading it fully into memory.
    ///
    /// # Errors
    ///
    /// [`LookupError::Unavailable`] when the file cannot be read (no
    /// database has been provisioned yet); [`LookupError::Database`] when
    /// the bytes do not parse as a lookup database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LookupError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LookupError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes).map_err(LookupError::from)
    }

    /// Builds a database directly from raw bytes.
    ///
    /// This is also the validation primitive the refresh pipeline uses: an
    /// extracted file that fails here must not be installed.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, MaxMindDbError> {
        Ok(Self {
            reader: Reader::from_source(bytes)?,
        })
    }

    /// Build epoch recorded in the database metadata (seconds since the
    /// Unix epoch).
    pub fn build_epoch(&self) -> u64 {
        self.reader.metadata.build_epoch
    }

    /// Looks up an address and decodes the matched record.
    ///
    /// An address with no matching record yields an empty
    /// [`Location`] -- geolocation coverage is inherently partial, so a
    /// miss is a successful empty result, not an error.
    ///
    /// # Errors
    ///
    /// [`LookupError::Database`] when the query or the record decode fails.
    pub fn lookup(&self, ip: IpAddr) -> Result<Location, LookupError> {
        let result = self.reader.lookup(ip)?;
        if !result.has_data() {
            trace!("no record for {ip}");
            return Ok(Location::default());
        }

        let location = result.decode::<Location>()?.unwrap_or_default();
        trace!(
            "record for {ip}: country={:?}, subdivisions={}",
            location.country.iso_code,
            location.subdivisions.len()
        );
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geoip::test_support::empty_database_bytes;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_is_unavailable() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("GeoLite2-City.mmdb");

        let err = GeoDatabase::open(&path).expect_err("missing file must not open");
        assert!(matches!(err, LookupError::Unavailable { .. }));
    }

    #[test]
    fn test_open_invalid_bytes_is_database_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("GeoLite2-City.mmdb");
        std::fs::write(&path, b"not a valid mmdb file").expect("Failed to write test file");

        let err = GeoDatabase::open(&path).expect_err("garbage must not parse");
        assert!(matches!(err, LookupError::Database(_)));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(GeoDatabase::from_bytes(b"garbage".to_vec()).is_err());
    }

    #[test]
    fn test_lookup_miss_yields_empty_location() {
        let db = GeoDatabase::from_bytes(empty_database_bytes())
            .expect("synthetic database must parse");

        for ip in ["8.8.8.8", "192.168.1.1", "2001:db8::1", "::1"] {
            let location = db
                .lookup(ip.parse().expect("test addresses are valid"))
                .expect("a miss is a successful empty result");
            assert_eq!(location, Location::default(), "lookup of {ip}");
            assert_eq!(location.city_name("en"), "");
            assert_eq!(location.full_iso(), "");
        }
    }

    #[test]
    fn test_build_epoch_comes_from_metadata() {
        let db = GeoDatabase::from_bytes(empty_database_bytes())
            .expect("synthetic database must parse");
        assert_eq!(db.build_epoch(), crate::geoip::test_support::TEST_BUILD_EPOCH);
    }
}
