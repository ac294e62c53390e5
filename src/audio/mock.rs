//! In-memory backend that records every call, for tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{BackendError, LoadError};

use super::backend::AudioBackend;
use super::types::{BufferId, DecodedAudio, SourceId, SourceState};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Decode(PathBuf),
    CreateBuffer(BufferId),
    CreateSource(SourceId),
    Bind(SourceId, BufferId),
    ListenerRelative(SourceId),
    Gain(SourceId, f32),
    Play(SourceId),
    Pause(SourceId),
    Stop(SourceId),
    DeleteSource(SourceId),
    DeleteBuffer(BufferId),
}

#[derive(Default)]
pub(crate) struct MockBackend {
    pub calls: Vec<Call>,
    pub undecodable: HashSet<PathBuf>,
    pub fail_buffer: bool,
    pub fail_source: bool,
    pub fail_query: bool,
    states: HashMap<SourceId, SourceState>,
    buffers: HashSet<BufferId>,
    next_id: u32,
}

impl MockBackend {
    fn id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Simulate the live source running out of samples.
    pub fn finish_all(&mut self) {
        for state in self.states.values_mut() {
            *state = SourceState::Stopped;
        }
    }

    pub fn live_sources(&self) -> usize {
        self.states.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn deletions(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::DeleteSource(_) | Call::DeleteBuffer(_)))
            .count()
    }

    pub fn decoded(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Decode(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn plays(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Play(_)))
            .count()
    }

    pub fn last_gain(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Gain(_, g) => Some(*g),
            _ => None,
        })
    }
}

impl AudioBackend for MockBackend {
    fn decode(&mut self, path: &Path) -> Result<DecodedAudio, LoadError> {
        self.calls.push(Call::Decode(path.to_path_buf()));
        if self.undecodable.contains(path) {
            return Err(LoadError::Decode {
                path: path.to_path_buf(),
                reason: "not vorbis".into(),
            });
        }
        // Two seconds of mono silence at 4 Hz.
        Ok(DecodedAudio {
            samples: vec![0.0; 8],
            channels: 1,
            sample_rate: 4,
        })
    }

    fn create_buffer(&mut self, _audio: DecodedAudio) -> Result<BufferId, LoadError> {
        if self.fail_buffer {
            return Err(LoadError::BackendResource("buffer".into()));
        }
        let id = BufferId(self.id());
        self.buffers.insert(id);
        self.calls.push(Call::CreateBuffer(id));
        Ok(id)
    }

    fn create_source(&mut self) -> Result<SourceId, LoadError> {
        if self.fail_source {
            return Err(LoadError::BackendResource("source".into()));
        }
        let id = SourceId(self.id());
        self.states.insert(id, SourceState::Stopped);
        self.calls.push(Call::CreateSource(id));
        Ok(id)
    }

    fn bind(&mut self, source: SourceId, buffer: BufferId) {
        self.calls.push(Call::Bind(source, buffer));
    }

    fn set_listener_relative(&mut self, source: SourceId) {
        self.calls.push(Call::ListenerRelative(source));
    }

    fn set_gain(&mut self, source: SourceId, gain: f32) {
        self.calls.push(Call::Gain(source, gain));
    }

    fn play(&mut self, source: SourceId) {
        self.calls.push(Call::Play(source));
        if let Some(state) = self.states.get_mut(&source) {
            *state = SourceState::Playing;
        }
    }

    fn pause(&mut self, source: SourceId) {
        self.calls.push(Call::Pause(source));
        if let Some(state) = self.states.get_mut(&source) {
            *state = SourceState::Paused;
        }
    }

    fn stop(&mut self, source: SourceId) {
        self.calls.push(Call::Stop(source));
        if let Some(state) = self.states.get_mut(&source) {
            *state = SourceState::Stopped;
        }
    }

    fn query_state(&self, source: SourceId) -> Result<SourceState, BackendError> {
        if self.fail_query {
            return Err(BackendError::Device("query failed".into()));
        }
        self.states
            .get(&source)
            .copied()
            .ok_or(BackendError::UnknownSource(source))
    }

    fn delete_source(&mut self, source: SourceId) {
        self.calls.push(Call::DeleteSource(source));
        self.states.remove(&source);
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.calls.push(Call::DeleteBuffer(buffer));
        self.buffers.remove(&buffer);
    }
}
