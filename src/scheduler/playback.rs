use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use crate::audio::{AudioBackend, NativeAudioHandle};
use crate::config::SchedulerSettings;
use crate::error::{Error, LoadError, Result};
use crate::library::{Catalog, Track};
use crate::playlist::Playlist;

use super::host::HostAudioSettings;

/// Tick thresholds, in host ticks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SchedulerTiming {
    /// Silence before ambient music starts on its own.
    pub min_ticks_between_music: u32,
    /// Grace period after a track starts before polling for its end.
    pub min_ticks_before_check: u32,
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        SchedulerSettings::default().into()
    }
}

impl From<SchedulerSettings> for SchedulerTiming {
    fn from(s: SchedulerSettings) -> Self {
        Self {
            min_ticks_between_music: s.min_ticks_between_music,
            min_ticks_before_check: s.min_ticks_before_check,
        }
    }
}

/// Owns the active playlist, the current track and the native handle, and
/// decides on every tick what plays next.
///
/// Single-threaded: every call must come from the thread that owns the
/// backend. Nothing here returns an error for a failed playback attempt;
/// failures are logged and leave the scheduler idle but tickable.
pub struct PlaybackScheduler<B: AudioBackend, H: HostAudioSettings> {
    handle: NativeAudioHandle<B>,
    host: H,
    catalog: Catalog,
    timing: SchedulerTiming,
    rng: StdRng,
    active: Option<Playlist>,
    current: Option<Track>,
    ticks_since_last_music: u32,
    ticks_since_track_start: u32,
}

impl<B: AudioBackend, H: HostAudioSettings> PlaybackScheduler<B, H> {
    pub fn new(backend: B, host: H, catalog: Catalog, timing: SchedulerTiming) -> Self {
        Self {
            handle: NativeAudioHandle::new(backend),
            host,
            catalog,
            timing,
            rng: StdRng::from_os_rng(),
            active: None,
            current: None,
            ticks_since_last_music: 0,
            ticks_since_track_start: 0,
        }
    }

    /// Replace the shuffle source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Advance the state machine by one host tick.
    pub fn tick(&mut self) {
        match &self.active {
            Some(playlist) if !playlist.is_empty() => {}
            _ => return,
        }

        self.refresh_volume();

        if let Some(current) = &self.current {
            self.ticks_since_track_start = self.ticks_since_track_start.saturating_add(1);
            if self.ticks_since_track_start >= self.timing.min_ticks_before_check
                && !self.handle.is_playing()
            {
                info!(track = %current.name, "track finished");
                self.ticks_since_track_start = 0;
                self.play_next();
                // One transition per tick.
                return;
            }
        }

        if self.handle.is_playing() {
            self.ticks_since_last_music = 0;
            return;
        }

        self.ticks_since_last_music = self.ticks_since_last_music.saturating_add(1);
        if self.ticks_since_last_music >= self.timing.min_ticks_between_music {
            debug!("silence cooldown elapsed, starting music");
            self.play_from_active();
            self.ticks_since_last_music = 0;
        }
    }

    /// Make `playlist` the active one and start playing from it right away.
    ///
    /// `None` stops playback and clears the active playlist. A playlist with
    /// no resolvable tracks is rejected and the current state is kept.
    pub fn set_active_playlist(&mut self, playlist: Option<Playlist>) -> Result<()> {
        let Some(playlist) = playlist else {
            self.stop();
            if let Some(old) = self.active.take() {
                info!(playlist = old.name(), "active playlist cleared");
            }
            return Ok(());
        };

        let playlist = self.resolved(playlist)?;
        info!(
            playlist = playlist.name(),
            tracks = playlist.len(),
            "active playlist set"
        );
        self.active = Some(playlist);
        self.stop();
        self.ticks_since_last_music = self.timing.min_ticks_between_music;
        self.play_from_active();
        Ok(())
    }

    /// Install `playlist` as active without starting it; the first eligible
    /// tick starts playback. Used when resuming a saved session.
    pub fn restore_active_playlist(&mut self, playlist: Playlist) -> Result<()> {
        let playlist = self.resolved(playlist)?;
        info!(playlist = playlist.name(), "restored active playlist");
        self.active = Some(playlist);
        self.ticks_since_last_music = self.timing.min_ticks_between_music;
        Ok(())
    }

    fn resolved(&self, mut playlist: Playlist) -> Result<Playlist> {
        let stale = playlist.is_empty() && !playlist.track_names().is_empty();
        if !playlist.is_resolved() || stale {
            playlist.resolve(&self.catalog);
            debug!(
                playlist = playlist.name(),
                resolved = playlist.len(),
                "resolved playlist against catalog"
            );
        }
        if playlist.is_empty() {
            warn!(playlist = playlist.name(), "playlist has no playable tracks");
            return Err(Error::EmptyPlaylist(playlist.name().to_string()));
        }
        Ok(playlist)
    }

    /// Stop whatever plays and start `track`.
    ///
    /// A track that cannot be loaded stays current with nothing playing, so
    /// the end-of-track check skips past it once the grace period is over.
    pub fn play_track(&mut self, track: &Track) {
        self.stop();
        let mut track = track.clone();

        match self.load_and_play(&mut track) {
            Ok(()) => {
                if let Some(active) = self.active.as_mut() {
                    active.record_loaded(&track.name, track.duration);
                }
                info!(track = %track.name, path = %track.path.display(), "playing track")
            }
            Err(LoadError::MissingFile(path)) => {
                error!(track = %track.name, path = %path.display(), "track file not found")
            }
            Err(e) => error!(track = %track.name, error = %e, "cannot play track"),
        }
        self.current = Some(track);
    }

    fn load_and_play(&mut self, track: &mut Track) -> std::result::Result<(), LoadError> {
        self.refresh_volume();
        self.handle.load(&track.path)?;
        track.loaded = true;
        if let Some(duration) = self.handle.loaded_duration() {
            track.duration = Some(duration);
        }
        self.handle.play();
        Ok(())
    }

    fn play_from_active(&mut self) {
        let track = self
            .active
            .as_mut()
            .and_then(|p| p.starting_track(&mut self.rng).cloned());
        if let Some(track) = track {
            self.play_track(&track);
        }
    }

    /// Advance the active playlist and play what it yields. An exhausted
    /// playlist stops playback and leaves the scheduler idle.
    pub fn play_next(&mut self) {
        let Some(playlist) = self.active.as_mut() else {
            return;
        };
        match playlist.next_track(&mut self.rng).cloned() {
            Some(track) => self.play_track(&track),
            None => {
                info!(playlist = playlist.name(), "playlist finished");
                self.stop();
            }
        }
    }

    pub fn play_previous(&mut self) {
        let Some(playlist) = self.active.as_mut() else {
            return;
        };
        match playlist.previous_track(&mut self.rng).cloned() {
            Some(track) => self.play_track(&track),
            None => {
                debug!(playlist = playlist.name(), "already at the first track");
            }
        }
    }

    /// Silence playback and reset both counters. The native pair stays
    /// allocated until the next load or shutdown.
    pub fn stop(&mut self) {
        self.handle.stop();
        self.current = None;
        self.ticks_since_last_music = 0;
        self.ticks_since_track_start = 0;
        debug!("playback stopped");
    }

    pub fn pause(&mut self) {
        if self.handle.is_playing() {
            self.handle.pause();
            debug!("playback paused");
        }
    }

    pub fn resume(&mut self) {
        if self.current.is_some() {
            self.handle.resume();
        }
    }

    /// Re-resolve the active playlist after the catalog changed.
    pub fn refresh_catalog(&mut self) {
        if let Some(playlist) = self.active.as_mut() {
            playlist.resolve(&self.catalog);
            debug!(
                playlist = playlist.name(),
                tracks = playlist.len(),
                "re-resolved active playlist"
            );
        }
    }

    /// Stop and release the native pair.
    pub fn shutdown(&mut self) {
        self.stop();
        self.handle.cleanup();
        info!("scheduler shut down");
    }

    fn refresh_volume(&mut self) {
        let gain = self.host.output_volume().gain();
        self.handle.set_volume(gain);
    }

    pub fn is_playing(&self) -> bool {
        self.handle.is_playing()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn active_playlist(&self) -> Option<&Playlist> {
        self.active.as_ref()
    }

    pub fn active_playlist_mut(&mut self) -> Option<&mut Playlist> {
        self.active.as_mut()
    }

    pub fn ticks_since_last_music(&self) -> u32 {
        self.ticks_since_last_music
    }

    pub fn ticks_since_track_start(&self) -> u32 {
        self.ticks_since_track_start
    }

    pub fn timing(&self) -> SchedulerTiming {
        self.timing
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn handle(&self) -> &NativeAudioHandle<B> {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut NativeAudioHandle<B> {
        &mut self.handle
    }
}
