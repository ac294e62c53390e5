//! Audio subsystem.
//!
//! [`AudioBackend`] is the seam to the native audio library; [`NativeAudioHandle`]
//! owns the single buffer/source pair the scheduler plays through.

mod backend;
mod handle;
mod rodio_backend;
mod types;

pub use backend::AudioBackend;
pub use handle::NativeAudioHandle;
pub use rodio_backend::RodioBackend;
pub use types::{BufferId, DecodedAudio, HandleState, SourceId, SourceState};

#[cfg(test)]
pub(crate) mod mock;
