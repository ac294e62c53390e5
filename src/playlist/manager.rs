use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::library::TrackLookup;

use super::model::Playlist;
use super::store::PlaylistStore;

/// All known playlists, keyed by name, backed by a [`PlaylistStore`].
///
/// The in-memory map is authoritative; a failed write is reported to the
/// caller but never rolls the map back.
pub struct PlaylistManager<S: PlaylistStore> {
    store: S,
    playlists: BTreeMap<String, Playlist>,
}

impl<S: PlaylistStore> PlaylistManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            playlists: BTreeMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the in-memory set with what the store holds, resolved against
    /// `catalog`. On a store failure the current set is kept.
    pub fn load<L: TrackLookup + ?Sized>(&mut self, catalog: &L) -> usize {
        match self.store.load_all() {
            Ok(loaded) => {
                self.playlists = loaded
                    .into_iter()
                    .map(|mut p| {
                        p.resolve(catalog);
                        (p.name().to_string(), p)
                    })
                    .collect();
                info!(count = self.playlists.len(), "loaded playlists");
            }
            Err(e) => warn!(error = %e, "cannot load playlists, keeping in-memory set"),
        }
        self.playlists.len()
    }

    pub fn resolve_all<L: TrackLookup + ?Sized>(&mut self, catalog: &L) {
        for playlist in self.playlists.values_mut() {
            playlist.resolve(catalog);
        }
    }

    pub fn create(&mut self, name: &str) -> Result<&mut Playlist> {
        if self.playlists.contains_key(name) {
            return Err(Error::DuplicatePlaylist(name.to_string()));
        }
        let playlist = Playlist::new(name);
        if let Err(e) = self.store.save(&playlist) {
            warn!(playlist = name, error = %e, "cannot save new playlist");
        }
        info!(playlist = name, "created playlist");
        Ok(self.playlists.entry(name.to_string()).or_insert(playlist))
    }

    pub fn get(&self, name: &str) -> Option<&Playlist> {
        self.playlists.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Playlist> {
        self.playlists.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.playlists.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Playlist> {
        self.playlists.values()
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Persist the playlist called `name` as it currently stands.
    pub fn save(&self, name: &str) -> Result<()> {
        let playlist = self
            .playlists
            .get(name)
            .ok_or_else(|| Error::UnknownPlaylist(name.to_string()))?;
        self.store.save(playlist)?;
        Ok(())
    }

    /// Insert or overwrite `playlist` and persist it.
    pub fn update(&mut self, playlist: Playlist) -> Result<()> {
        let name = playlist.name().to_string();
        self.playlists.insert(name.clone(), playlist);
        self.save(&name)
    }

    pub fn delete(&mut self, name: &str) -> Result<Playlist> {
        let removed = self
            .playlists
            .remove(name)
            .ok_or_else(|| Error::UnknownPlaylist(name.to_string()))?;
        if let Err(e) = self.store.delete(name) {
            warn!(playlist = name, error = %e, "cannot delete playlist file");
        }
        info!(playlist = name, "deleted playlist");
        Ok(removed)
    }
}
