//! Per-frame host driver.
//!
//! [`Session`] ties the scheduler to the host's lifecycle: it stops music
//! outside a session, follows the host's pause state, restores the saved
//! active playlist on entry and writes it back on exit. Playlist edits go
//! through here so the scheduler's active copy never drifts from the
//! managed one.

use tracing::{debug, info, warn};

use crate::audio::AudioBackend;
use crate::error::{Error, Result};
use crate::library::{Track, TrackLookup};
use crate::playlist::{Playlist, PlaylistManager, PlaylistStore};
use crate::scheduler::{HostAudioSettings, HostSignals, PlaybackScheduler};

pub struct Session<B: AudioBackend, H: HostAudioSettings, S: PlaylistStore> {
    scheduler: PlaybackScheduler<B, H>,
    playlists: PlaylistManager<S>,
    in_session: bool,
    seen_generation: u64,
    /// Saved playlist that could not start because its tracks were not
    /// scanned yet; retried when the catalog changes.
    pending_restore: Option<String>,
    replace_host_music: bool,
}

impl<B: AudioBackend, H: HostAudioSettings, S: PlaylistStore> Session<B, H, S> {
    pub fn new(scheduler: PlaybackScheduler<B, H>, mut playlists: PlaylistManager<S>) -> Self {
        let seen_generation = scheduler.catalog().generation();
        playlists.load(scheduler.catalog());
        Self {
            scheduler,
            playlists,
            in_session: false,
            seen_generation,
            pending_restore: None,
            replace_host_music: false,
        }
    }

    /// Silence the host's own music on every in-session frame, so only
    /// this scheduler is heard.
    pub fn with_host_music_replaced(mut self, replace: bool) -> Self {
        self.replace_host_music = replace;
        self
    }

    /// Run one host frame.
    pub fn frame(&mut self, signals: &impl HostSignals) {
        self.sync_catalog();

        let in_session = signals.in_session();
        match (self.in_session, in_session) {
            (false, true) => self.enter(),
            (true, false) => self.leave(),
            _ => {}
        }
        self.in_session = in_session;

        if !in_session {
            if self.scheduler.is_playing() {
                self.scheduler.stop();
            }
            return;
        }

        let paused = signals.is_paused();
        if paused {
            self.scheduler.pause();
        } else {
            self.scheduler.resume();
        }

        if self.replace_host_music {
            signals.silence_host_music();
        }

        if !paused {
            self.scheduler.tick();
        }
    }

    fn enter(&mut self) {
        info!("session started");
        let name = match self.playlists.store().load_active_name() {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "cannot read active playlist pointer");
                None
            }
        };
        if let Some(name) = name {
            self.restore(name);
        }
    }

    fn restore(&mut self, name: String) {
        let Some(playlist) = self.playlists.get(&name).cloned() else {
            warn!(playlist = %name, "saved active playlist no longer exists");
            if let Err(e) = self.playlists.store().save_active_name(None) {
                warn!(error = %e, "cannot clear active playlist pointer");
            }
            return;
        };
        // Playback starts on the first eligible tick, not here.
        if let Err(Error::EmptyPlaylist(_)) = self.scheduler.restore_active_playlist(playlist) {
            if self.scheduler.catalog().is_scanning() || self.scheduler.catalog().is_empty() {
                debug!(playlist = %name, "waiting for scan to restore playlist");
                self.pending_restore = Some(name);
            }
        }
    }

    fn leave(&mut self) {
        info!("session ended");
        self.pending_restore = None;
        self.persist_active();
        self.scheduler.stop();
    }

    fn sync_catalog(&mut self) {
        let generation = self.scheduler.catalog().generation();
        if generation == self.seen_generation {
            return;
        }
        self.seen_generation = generation;
        self.playlists.resolve_all(self.scheduler.catalog());
        self.scheduler.refresh_catalog();
        debug!(generation, "catalog changed, playlists re-resolved");

        if let Some(name) = self.pending_restore.take() {
            if self.in_session && self.scheduler.active_playlist().is_none() {
                self.restore(name);
            }
        }
    }

    /// Write the active playlist, cursor included, back to the store.
    pub fn persist_active(&mut self) {
        let Some(active) = self.scheduler.active_playlist().cloned() else {
            return;
        };
        let name = active.name().to_string();
        if let Err(e) = self.playlists.update(active) {
            warn!(playlist = %name, error = %e, "cannot persist active playlist");
        }
    }

    /// Activate the playlist called `name`, or clear the active one, and
    /// remember the choice for the next session.
    pub fn activate(&mut self, name: Option<&str>) -> Result<()> {
        self.pending_restore = None;
        self.persist_active();

        let playlist = match name {
            Some(name) => Some(
                self.playlists
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::UnknownPlaylist(name.to_string()))?,
            ),
            None => None,
        };
        self.scheduler.set_active_playlist(playlist)?;

        if let Err(e) = self.playlists.store().save_active_name(name) {
            warn!(error = %e, "cannot save active playlist pointer");
        }
        Ok(())
    }

    /// Play a catalog track directly, outside any playlist order.
    pub fn play(&mut self, track_name: &str) -> Result<()> {
        let track = self.lookup(track_name)?;
        self.scheduler.play_track(&track);
        Ok(())
    }

    pub fn create(&mut self, name: &str) -> Result<()> {
        self.playlists.create(name)?;
        Ok(())
    }

    /// Delete a playlist. Deleting the active one stops playback and clears
    /// the saved pointer.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.playlists.delete(name)?;
        if self.active_name() == Some(name) {
            self.scheduler.set_active_playlist(None)?;
            if let Err(e) = self.playlists.store().save_active_name(None) {
                warn!(error = %e, "cannot clear active playlist pointer");
            }
        }
        Ok(())
    }

    /// Returns the new shuffle flag.
    pub fn toggle_shuffle(&mut self, name: &str) -> Result<bool> {
        let shuffle = !self.playlist(name)?.shuffle();
        self.edit(name, |p| p.set_shuffle(shuffle))?;
        Ok(shuffle)
    }

    /// Returns the new repeat flag.
    pub fn toggle_repeat(&mut self, name: &str) -> Result<bool> {
        let repeat = !self.playlist(name)?.repeat();
        self.edit(name, |p| p.set_repeat(repeat))?;
        Ok(repeat)
    }

    /// Returns `false` if the track was already in the playlist.
    pub fn add_track(&mut self, name: &str, track_name: &str) -> Result<bool> {
        let track = self.lookup(track_name)?;
        self.edit(name, |p| p.add_track(&track))
    }

    /// Returns `false` if the track was not in the playlist.
    pub fn remove_track(&mut self, name: &str, track_name: &str) -> Result<bool> {
        self.edit(name, |p| p.remove_track(track_name))
    }

    /// Apply `f` to the managed playlist and to the scheduler's active copy
    /// when they are the same playlist, then save.
    fn edit<T>(&mut self, name: &str, mut f: impl FnMut(&mut Playlist) -> T) -> Result<T> {
        let playlist = self
            .playlists
            .get_mut(name)
            .ok_or_else(|| Error::UnknownPlaylist(name.to_string()))?;
        let out = f(playlist);

        if let Some(active) = self.scheduler.active_playlist_mut() {
            if active.name() == name {
                f(active);
            }
        }

        if let Err(e) = self.playlists.save(name) {
            warn!(playlist = name, error = %e, "cannot save playlist");
        }
        Ok(out)
    }

    fn playlist(&self, name: &str) -> Result<&Playlist> {
        self.playlists
            .get(name)
            .ok_or_else(|| Error::UnknownPlaylist(name.to_string()))
    }

    fn lookup(&self, track_name: &str) -> Result<Track> {
        self.scheduler
            .catalog()
            .lookup(track_name)
            .ok_or_else(|| Error::UnknownTrack(track_name.to_string()))
    }

    pub fn active_name(&self) -> Option<&str> {
        self.scheduler.active_playlist().map(Playlist::name)
    }

    pub fn in_session(&self) -> bool {
        self.in_session
    }

    pub fn scheduler(&self) -> &PlaybackScheduler<B, H> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut PlaybackScheduler<B, H> {
        &mut self.scheduler
    }

    pub fn playlists(&self) -> &PlaylistManager<S> {
        &self.playlists
    }

    /// Persist the active playlist and release the native pair.
    pub fn shutdown(&mut self) {
        self.persist_active();
        self.scheduler.shutdown();
    }
}
