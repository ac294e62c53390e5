use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::model::Track;

/// Anything playlists can resolve track names against.
pub trait TrackLookup {
    fn lookup(&self, name: &str) -> Option<Track>;
}

impl TrackLookup for [Track] {
    fn lookup(&self, name: &str) -> Option<Track> {
        self.iter().find(|t| t.name == name).cloned()
    }
}

impl TrackLookup for Vec<Track> {
    fn lookup(&self, name: &str) -> Option<Track> {
        self.as_slice().lookup(name)
    }
}

#[derive(Default)]
struct Shared {
    snapshot: RwLock<Arc<[Track]>>,
    generation: AtomicU64,
    scanning: AtomicBool,
}

/// Shared handle to the current set of known tracks.
///
/// A scan worker builds a complete list off-thread and publishes it with
/// [`Catalog::replace`]; readers only ever see whole snapshots. Every publish
/// bumps [`Catalog::generation`] so owners of resolved playlists can tell
/// when to re-resolve.
#[derive(Clone, Default)]
pub struct Catalog {
    shared: Arc<Shared>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        let catalog = Self::default();
        catalog.replace(tracks);
        catalog
    }

    /// Publish a new snapshot.
    pub fn replace(&self, tracks: Vec<Track>) {
        let tracks: Arc<[Track]> = tracks.into();
        *self
            .shared
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = tracks;
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// The current snapshot. Cheap to clone and immutable.
    pub fn snapshot(&self) -> Arc<[Track]> {
        self.shared
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_scanning(&self) -> bool {
        self.shared.scanning.load(Ordering::Acquire)
    }

    /// Claim the scan slot. Returns false when a scan is already running.
    pub(super) fn begin_scan(&self) -> bool {
        self.shared
            .scanning
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(super) fn end_scan(&self) {
        self.shared.scanning.store(false, Ordering::Release);
    }
}

impl TrackLookup for Catalog {
    fn lookup(&self, name: &str) -> Option<Track> {
        self.snapshot().lookup(name)
    }
}
