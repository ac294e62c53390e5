//! Single-slot owner of one buffer/source pair in the native backend.
//!
//! Every load releases the previous pair before allocating a new one, and the
//! pair is released on drop, so at most one pair is ever live.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::LoadError;

use super::backend::AudioBackend;
use super::types::{BufferId, HandleState, SourceId, SourceState};

#[derive(Debug, Copy, Clone)]
struct Voice {
    source: SourceId,
    buffer: BufferId,
}

pub struct NativeAudioHandle<B: AudioBackend> {
    backend: B,
    voice: Option<Voice>,
    state: HandleState,
    volume: f32,
    current_path: Option<PathBuf>,
    duration: Option<Duration>,
}

impl<B: AudioBackend> NativeAudioHandle<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            voice: None,
            state: HandleState::Empty,
            volume: 1.0,
            current_path: None,
            duration: None,
        }
    }

    /// Decode `path` and bind it to a fresh buffer/source pair.
    ///
    /// Any previously held pair is released first, so on error the handle is
    /// always [`HandleState::Empty`].
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        self.cleanup();

        if !path.exists() {
            return Err(LoadError::MissingFile(path.to_path_buf()));
        }

        let audio = self.backend.decode(path)?;
        let (channels, sample_rate) = (audio.channels, audio.sample_rate);
        let duration = audio.duration();

        let buffer = self.backend.create_buffer(audio)?;
        let source = match self.backend.create_source() {
            Ok(source) => source,
            Err(e) => {
                self.backend.delete_buffer(buffer);
                return Err(e);
            }
        };

        self.backend.bind(source, buffer);
        self.backend.set_listener_relative(source);
        self.backend.set_gain(source, self.volume);

        self.voice = Some(Voice { source, buffer });
        self.state = HandleState::Loaded;
        self.current_path = Some(path.to_path_buf());
        self.duration = Some(duration);
        info!(
            path = %path.display(),
            channels,
            sample_rate,
            "loaded track into native handle"
        );
        Ok(())
    }

    pub fn play(&mut self) {
        let Some(voice) = self.voice else {
            warn!("play requested with nothing loaded");
            return;
        };
        if matches!(self.backend.query_state(voice.source), Ok(SourceState::Playing)) {
            self.state = HandleState::Playing;
            return;
        }
        self.backend.play(voice.source);
        self.state = HandleState::Playing;
        debug!("native source playing");
    }

    pub fn pause(&mut self) {
        let Some(voice) = self.voice else { return };
        if self.state != HandleState::Playing || !self.is_playing() {
            return;
        }
        self.backend.pause(voice.source);
        self.state = HandleState::Paused;
        debug!("native source paused");
    }

    pub fn resume(&mut self) {
        let Some(voice) = self.voice else { return };
        if self.state != HandleState::Paused {
            return;
        }
        self.backend.play(voice.source);
        self.state = HandleState::Playing;
        debug!("native source resumed");
    }

    /// Silence the source without releasing it.
    pub fn stop(&mut self) {
        if let Some(voice) = self.voice {
            self.backend.stop(voice.source);
            self.state = HandleState::Loaded;
            debug!("native source stopped");
        }
    }

    /// Whether the backend reports the source as playing.
    ///
    /// A failed query counts as "not playing" so the scheduler moves on
    /// instead of waiting forever on a broken source.
    pub fn is_playing(&self) -> bool {
        let Some(voice) = self.voice else {
            return false;
        };
        match self.backend.query_state(voice.source) {
            Ok(state) => state == SourceState::Playing,
            Err(e) => {
                warn!(error = %e, "source state query failed");
                false
            }
        }
    }

    /// Clamp to `0.0..=1.0`, remember it, and apply it to the live source.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        if let Some(voice) = self.voice {
            self.backend.set_gain(voice.source, self.volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Release the source, then its buffer. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if let Some(voice) = self.voice.take() {
            self.backend.stop(voice.source);
            self.backend.delete_source(voice.source);
            self.backend.delete_buffer(voice.buffer);
            debug!("released native buffer and source");
        }
        self.state = HandleState::Empty;
        self.current_path = None;
        self.duration = None;
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Length of the loaded track, known once decoded.
    pub fn loaded_duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: AudioBackend> Drop for NativeAudioHandle<B> {
    fn drop(&mut self) {
        self.cleanup();
    }
}
