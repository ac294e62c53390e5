//! [`AudioBackend`] on top of `rodio`.
//!
//! A buffer is a decoded sample vector; a source is a `Sink` on the default
//! output stream. Binding queues the shared buffer on the sink, and a sink
//! that ran dry is refilled from its bound buffer on the next `play`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::warn;

use crate::error::{BackendError, LoadError};

use super::backend::AudioBackend;
use super::types::{BufferId, DecodedAudio, SourceId, SourceState};

struct StoredBuffer {
    samples: Arc<Vec<f32>>,
    channels: u16,
    sample_rate: u32,
}

/// Plays a stored buffer without copying it; every bind or replay shares
/// the same samples.
struct PcmSource {
    samples: Arc<Vec<f32>>,
    pos: usize,
    channels: u16,
    sample_rate: u32,
}

impl Iterator for PcmSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.samples.get(self.pos).copied()?;
        self.pos += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.samples.len().saturating_sub(self.pos);
        (left, Some(left))
    }
}

impl Source for PcmSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        let frames = self.samples.len() as u64 / u64::from(self.channels.max(1));
        Some(Duration::from_secs_f64(
            frames as f64 / f64::from(self.sample_rate.max(1)),
        ))
    }
}

struct StoredSource {
    sink: Sink,
    buffer: Option<BufferId>,
}

pub struct RodioBackend {
    stream: OutputStream,
    buffers: HashMap<BufferId, StoredBuffer>,
    sources: HashMap<SourceId, StoredSource>,
    next_id: u32,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| BackendError::Device(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            buffers: HashMap::new(),
            sources: HashMap::new(),
            next_id: 1,
        })
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    fn queue_buffer(&self, source: SourceId) {
        let Some(stored) = self.sources.get(&source) else {
            return;
        };
        let Some(buffer) = stored.buffer.and_then(|b| self.buffers.get(&b)) else {
            return;
        };
        stored.sink.append(PcmSource {
            samples: Arc::clone(&buffer.samples),
            pos: 0,
            channels: buffer.channels,
            sample_rate: buffer.sample_rate,
        });
    }
}

impl AudioBackend for RodioBackend {
    fn decode(&mut self, path: &Path) -> Result<DecodedAudio, LoadError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::MissingFile(path.to_path_buf()),
            _ => LoadError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.collect();

        if samples.is_empty() {
            return Err(LoadError::Decode {
                path: path.to_path_buf(),
                reason: "no audio frames".to_string(),
            });
        }

        Ok(DecodedAudio {
            samples,
            channels,
            sample_rate,
        })
    }

    fn create_buffer(&mut self, audio: DecodedAudio) -> Result<BufferId, LoadError> {
        if audio.channels == 0 || audio.sample_rate == 0 {
            return Err(LoadError::BackendResource(format!(
                "buffer for {} channel(s) at {} Hz",
                audio.channels, audio.sample_rate
            )));
        }
        let id = BufferId(self.next_id());
        self.buffers.insert(
            id,
            StoredBuffer {
                samples: Arc::new(audio.samples),
                channels: audio.channels,
                sample_rate: audio.sample_rate,
            },
        );
        Ok(id)
    }

    fn create_source(&mut self) -> Result<SourceId, LoadError> {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        let id = SourceId(self.next_id());
        self.sources.insert(id, StoredSource { sink, buffer: None });
        Ok(id)
    }

    fn bind(&mut self, source: SourceId, buffer: BufferId) {
        if !self.buffers.contains_key(&buffer) {
            warn!(?buffer, "bind to unknown buffer ignored");
            return;
        }
        let Some(stored) = self.sources.get_mut(&source) else {
            return;
        };
        stored.sink.clear();
        stored.buffer = Some(buffer);
        self.queue_buffer(source);
    }

    fn set_listener_relative(&mut self, _source: SourceId) {
        // rodio mixes straight to the output; there is no listener to place.
    }

    fn set_gain(&mut self, source: SourceId, gain: f32) {
        if let Some(stored) = self.sources.get(&source) {
            stored.sink.set_volume(gain);
        }
    }

    fn play(&mut self, source: SourceId) {
        let Some(stored) = self.sources.get(&source) else {
            return;
        };
        if stored.sink.empty() {
            self.queue_buffer(source);
        }
        if let Some(stored) = self.sources.get(&source) {
            stored.sink.play();
        }
    }

    fn pause(&mut self, source: SourceId) {
        if let Some(stored) = self.sources.get(&source) {
            stored.sink.pause();
        }
    }

    fn stop(&mut self, source: SourceId) {
        // `clear` drops the queue and leaves the sink paused; the next `play`
        // re-queues the bound buffer from the start.
        if let Some(stored) = self.sources.get(&source) {
            stored.sink.clear();
        }
    }

    fn query_state(&self, source: SourceId) -> Result<SourceState, BackendError> {
        let stored = self
            .sources
            .get(&source)
            .ok_or(BackendError::UnknownSource(source))?;
        Ok(if stored.sink.empty() {
            SourceState::Stopped
        } else if stored.sink.is_paused() {
            SourceState::Paused
        } else {
            SourceState::Playing
        })
    }

    fn delete_source(&mut self, source: SourceId) {
        if let Some(stored) = self.sources.remove(&source) {
            stored.sink.stop();
        }
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_source_shares_samples_and_reports_length() {
        let samples = Arc::new(vec![0.1, 0.2, 0.3, 0.4]);
        let source = PcmSource {
            samples: Arc::clone(&samples),
            pos: 0,
            channels: 2,
            sample_rate: 2,
        };

        assert_eq!(Arc::strong_count(&samples), 2);
        assert_eq!(source.total_duration(), Some(Duration::from_secs(1)));
        assert_eq!(source.size_hint(), (4, Some(4)));
        assert_eq!(source.collect::<Vec<_>>(), vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(Arc::strong_count(&samples), 1);
    }
}
