use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::library::{Track, TrackLookup};

/// A named, ordered list of track names with shuffle/repeat policy and a
/// playback cursor.
///
/// `track_names` is the source of truth. The resolved track list is a cache
/// rebuilt by [`Playlist::resolve`]; `None` means it was never resolved
/// (e.g. freshly deserialized). Edits go through [`Playlist::add_track`] and
/// [`Playlist::remove_track`], which keep both in step.
///
/// The cursor indexes the resolved list and may be out of range after edits
/// or once a non-repeating playlist is exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    name: String,
    #[serde(default)]
    shuffle: bool,
    #[serde(default)]
    repeat: bool,
    #[serde(rename = "currentIndex", default)]
    cursor: i64,
    #[serde(rename = "tracks", default)]
    track_names: Vec<String>,
    #[serde(skip)]
    resolved: Option<Vec<Track>>,
}

impl Playlist {
    /// An empty playlist: sequential, repeating, cursor at the start.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shuffle: false,
            repeat: true,
            cursor: 0,
            track_names: Vec::new(),
            resolved: Some(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn track_names(&self) -> &[String] {
        &self.track_names
    }

    /// Resolved tracks, empty until [`Playlist::resolve`] has run.
    pub fn tracks(&self) -> &[Track] {
        self.resolved.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tracks().len()
    }

    /// No playable tracks resolved.
    pub fn is_empty(&self) -> bool {
        self.tracks().is_empty()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: i64) {
        self.cursor = cursor;
    }

    /// Rebuild the resolved list from `track_names`. Names the catalog does
    /// not know are skipped but kept in `track_names`.
    pub fn resolve<L: TrackLookup + ?Sized>(&mut self, catalog: &L) {
        let tracks = self
            .track_names
            .iter()
            .filter_map(|name| catalog.lookup(name))
            .collect();
        self.resolved = Some(tracks);
    }

    /// Append `track`. Returns false if a track with that name is already listed.
    pub fn add_track(&mut self, track: &Track) -> bool {
        if self.track_names.iter().any(|n| n == &track.name) {
            return false;
        }
        self.track_names.push(track.name.clone());
        if let Some(resolved) = self.resolved.as_mut() {
            resolved.push(track.clone());
        }
        true
    }

    /// Remove the track named `name`. Returns false if it was not listed.
    pub fn remove_track(&mut self, name: &str) -> bool {
        let before = self.track_names.len();
        self.track_names.retain(|n| n != name);
        if let Some(resolved) = self.resolved.as_mut() {
            resolved.retain(|t| t.name != name);
        }
        self.track_names.len() != before
    }

    /// Mark the resolved entry for `name` as loaded, recording its decoded
    /// length when known.
    pub fn record_loaded(&mut self, name: &str, duration: Option<Duration>) {
        let Some(resolved) = self.resolved.as_mut() else {
            return;
        };
        for track in resolved.iter_mut().filter(|t| t.name == name) {
            track.loaded = true;
            if duration.is_some() {
                track.duration = duration;
            }
        }
    }

    fn in_bounds(&self, index: i64) -> bool {
        index >= 0 && (index as usize) < self.len()
    }

    /// Track under the cursor, or the first track if the cursor is out of range.
    pub fn current_track(&self) -> Option<&Track> {
        let tracks = self.tracks();
        if self.in_bounds(self.cursor) {
            return tracks.get(self.cursor as usize);
        }
        tracks.first()
    }

    /// Advance the cursor and return the track it lands on.
    ///
    /// Shuffled playlists jump to a random index and never run out, whatever
    /// the repeat flag says. Sequential playlists wrap to the start when
    /// repeating; otherwise they return `None` and leave the cursor past the
    /// end, so later calls keep returning `None`.
    pub fn next_track<R: Rng>(&mut self, rng: &mut R) -> Option<&Track> {
        let len = self.len();
        if len == 0 {
            return None;
        }

        if self.shuffle {
            self.cursor = rng.random_range(0..len) as i64;
        } else {
            // A negative cursor means "before the start"; an exhausted one
            // stays pinned at `len`.
            self.cursor = self.cursor.clamp(-1, len as i64 - 1) + 1;
            if self.cursor >= len as i64 {
                if !self.repeat {
                    return None;
                }
                self.cursor = 0;
            }
        }

        self.current_track()
    }

    /// Step the cursor back; mirrors [`Playlist::next_track`], wrapping to the
    /// last track when repeating. Shuffled playlists pick a fresh random index.
    pub fn previous_track<R: Rng>(&mut self, rng: &mut R) -> Option<&Track> {
        let len = self.len();
        if len == 0 {
            return None;
        }

        if self.shuffle {
            self.cursor = rng.random_range(0..len) as i64;
        } else {
            // An exhausted cursor steps back onto the last track.
            self.cursor = self.cursor.clamp(0, len as i64) - 1;
            if self.cursor < 0 {
                if !self.repeat {
                    return None;
                }
                self.cursor = len as i64 - 1;
            }
        }

        self.current_track()
    }

    /// Track to start from when playback begins from silence.
    ///
    /// Shuffled playlists pick at random. Sequential ones start at the cursor,
    /// replacing an out-of-range cursor with a random index.
    pub fn starting_track<R: Rng>(&mut self, rng: &mut R) -> Option<&Track> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        if self.shuffle || !self.in_bounds(self.cursor) {
            self.cursor = rng.random_range(0..len) as i64;
        }
        self.current_track()
    }
}
