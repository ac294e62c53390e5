//! Audio-related small types and handles.
//!
//! Backend handles are opaque ids; only the backend that issued them knows
//! what they refer to.

use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

/// Playback state of a backend source as reported by the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SourceState {
    Playing,
    Paused,
    Stopped,
}

/// Lifecycle of a [`NativeAudioHandle`](super::NativeAudioHandle).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum HandleState {
    /// No buffer/source pair allocated.
    #[default]
    Empty,
    /// Pair allocated, not started (or stopped).
    Loaded,
    Playing,
    Paused,
}

/// A fully decoded track, interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration(&self) -> Duration {
        if self.channels == 0 || self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let frames = self.samples.len() as f64 / f64::from(self.channels);
        Duration::from_secs_f64(frames / f64::from(self.sample_rate))
    }
}
