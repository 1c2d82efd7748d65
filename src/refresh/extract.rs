//! Archive extraction.
//!
//! Turns a downloaded archive into raw database bytes. The two origin
//! formats sit behind an explicit [`ArchiveLayout`] selector chosen from
//! the refresh target -- the layout is never inferred from content, so a
//! future edition that changes format means adding a variant here rather
//! than changing callers.

use std::ffi::OsStr;
use std::io::Read;

use flate2::read::GzDecoder;
use log::info;
use tar::Archive;

use crate::config::{GEOLITE_DB_NAME, RefreshTarget};
use crate::error_handling::RefreshError;

/// How the database is packaged inside the downloaded archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveLayout {
    /// The gzip stream is the database itself (free/lite distribution).
    GzipOnly,
    /// The gzip stream wraps a tar archive containing the database among
    /// other entries (commercial distribution).
    TarGz,
}

impl ArchiveLayout {
    /// Layout the given refresh target's origin serves.
    pub fn for_target(target: RefreshTarget) -> Self {
        match target {
            RefreshTarget::Lite => ArchiveLayout::GzipOnly,
            RefreshTarget::Commercial => ArchiveLayout::TarGz,
        }
    }
}

/// Database bytes pulled out of an archive, with the file name they should
/// be installed under.
pub(crate) struct ExtractedDatabase {
    pub(crate) name: String,
    pub(crate) bytes: Vec<u8>,
}

/// Extracts the database from a downloaded archive.
///
/// For [`ArchiveLayout::TarGz`] the tar entries are walked in stream
/// order; the first regular file whose name carries a `.mmdb` extension
/// wins, identified by base name (any directory prefix is discarded), and
/// the remaining entries are ignored. Reaching the end of the stream
/// without a match is an error.
pub(crate) fn extract_archive(
    archive: &[u8],
    layout: ArchiveLayout,
) -> Result<ExtractedDatabase, RefreshError> {
    match layout {
        ArchiveLayout::GzipOnly => {
            let mut decoder = GzDecoder::new(archive);
            let mut bytes = Vec::new();
            decoder
                .read_to_end(&mut bytes)
                .map_err(RefreshError::Decompress)?;
            info!("Extracting {GEOLITE_DB_NAME} from archive");
            Ok(ExtractedDatabase {
                name: GEOLITE_DB_NAME.to_string(),
                bytes,
            })
        }
        ArchiveLayout::TarGz => {
            let mut tar = Archive::new(GzDecoder::new(archive));
            let entries = tar.entries().map_err(RefreshError::ArchiveRead)?;
            for entry in entries {
                let mut entry = entry.map_err(RefreshError::ArchiveRead)?;
                if !entry.header().entry_type().is_file() {
                    continue;
                }
                let name = match database_entry_name(&entry)? {
                    Some(name) => name,
                    None => continue,
                };

                let mut bytes = Vec::new();
                entry
                    .read_to_end(&mut bytes)
                    .map_err(RefreshError::ArchiveRead)?;
                info!("Extracting {name} from archive");
                return Ok(ExtractedDatabase { name, bytes });
            }
            Err(RefreshError::DatabaseEntryMissing)
        }
    }
}

/// Base name of a tar entry when it is a `.mmdb` file, `None` otherwise.
fn database_entry_name<R: Read>(entry: &tar::Entry<R>) -> Result<Option<String>, RefreshError> {
    let path = entry.path().map_err(RefreshError::ArchiveRead)?;
    if path.extension().and_then(OsStr::to_str) != Some("mmdb") {
        return Ok(None);
    }
    Ok(path
        .file_name()
        .and_then(OsStr::to_str)
        .map(str::to_owned))
}
