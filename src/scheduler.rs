//! Tick-driven playback scheduler.
//!
//! The host calls [`PlaybackScheduler::tick`] once per frame while a session
//! is active; the scheduler decides whether to advance, start ambient music,
//! or leave things alone.

mod host;
mod playback;

pub use host::{HostAudioSettings, HostSignals, OutputVolume};
pub use playback::{PlaybackScheduler, SchedulerTiming};
