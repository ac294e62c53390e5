use std::path::PathBuf;
use std::time::Duration;

/// A playable file known to the catalog.
///
/// `name` is the file stem and is the identity playlists refer to; comparisons
/// are case-sensitive. `duration` is probed at scan time when possible.
/// Decoding fills in `loaded` and the exact `duration` on the scheduler's
/// copy and the active playlist's entry; catalog snapshots are immutable and
/// keep the scan-time values until the next scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub path: PathBuf,
    pub file_size: u64,
    pub duration: Option<Duration>,
    pub loaded: bool,
}

impl Track {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, file_size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            file_size,
            duration: None,
            loaded: false,
        }
    }
}
