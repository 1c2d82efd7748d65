//! Configuration constants.
//!
//! This module defines the fixed origin endpoints, local file names, and
//! operational limits used by the refresh pipeline.

use std::time::Duration;

/// Download URL for the free GeoLite2 city database (a gzip-compressed
/// `.mmdb` file with no tar layer).
pub const GEOLITE_DOWNLOAD_URL: &str =
    "http://geolite.maxmind.com/download/geoip/database/GeoLite2-City.mmdb.gz";

/// Download URL template for the commercial city database (a gzip-compressed
/// tar archive). The percent-encoded license key is appended to this.
pub const COMMERCIAL_DOWNLOAD_URL: &str =
    "https://www.maxmind.com/app/geoip_download?edition_id=GeoIP2-City&suffix=tar.gz&license_key=";

/// Environment variable holding the MaxMind license key. Required for the
/// commercial edition; checked before any network activity.
pub const LICENSE_KEY_ENV: &str = "MAXMIND_LICENSE";

/// File name the lite database is installed under.
pub const GEOLITE_DB_NAME: &str = "GeoLite2-City.mmdb";

/// Cache file name for the lite archive.
pub const LITE_CACHE_FILE: &str = "geolite.gz";

/// Cache file name for the commercial archive.
pub const COMMERCIAL_CACHE_FILE: &str = "geoip.tar.gz";

/// `strftime` pattern producing an RFC 1123 HTTP date in GMT, the format the
/// origin expects in `If-Modified-Since` and reports in `Last-Modified`.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Overall timeout for a single origin request. Database archives run to
/// tens of megabytes, so this is generous.
pub const ARCHIVE_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Maximum accepted archive download size in bytes (128MB).
/// Responses larger than this abort the refresh rather than exhaust memory.
pub const MAX_ARCHIVE_DOWNLOAD_SIZE: usize = 128 * 1024 * 1024;
