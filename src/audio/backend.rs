use std::path::Path;

use crate::error::{BackendError, LoadError};

use super::types::{BufferId, DecodedAudio, SourceId, SourceState};

/// Capability contract of the native audio library.
///
/// Calls arrive from the single thread that owns the handle; implementations
/// need no internal locking. Operations on a handle that was already deleted
/// are ignored by the backend.
pub trait AudioBackend {
    /// Decode a whole file into interleaved PCM.
    fn decode(&mut self, path: &Path) -> Result<DecodedAudio, LoadError>;

    fn create_buffer(&mut self, audio: DecodedAudio) -> Result<BufferId, LoadError>;

    fn create_source(&mut self) -> Result<SourceId, LoadError>;

    /// Attach `buffer` as the data `source` plays.
    fn bind(&mut self, source: SourceId, buffer: BufferId);

    /// Place `source` on the listener, unattenuated and centred.
    fn set_listener_relative(&mut self, source: SourceId);

    fn set_gain(&mut self, source: SourceId, gain: f32);

    /// Start from the beginning, or continue when paused.
    fn play(&mut self, source: SourceId);

    fn pause(&mut self, source: SourceId);

    /// Halt and rewind. The source keeps its buffer.
    fn stop(&mut self, source: SourceId);

    fn query_state(&self, source: SourceId) -> Result<SourceState, BackendError>;

    fn delete_source(&mut self, source: SourceId);

    fn delete_buffer(&mut self, buffer: BufferId);
}
