//! What the scheduler reads from its host.

/// Host mixer levels, both gains in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OutputVolume {
    pub music: f32,
    pub master: f32,
}

impl OutputVolume {
    /// Effective gain for the music channel.
    pub fn gain(&self) -> f32 {
        (self.music * self.master).clamp(0.0, 1.0)
    }
}

impl Default for OutputVolume {
    fn default() -> Self {
        Self {
            music: 1.0,
            master: 1.0,
        }
    }
}

/// Host audio settings, read on every tick so changes land within one tick.
pub trait HostAudioSettings {
    fn output_volume(&self) -> OutputVolume;
}

impl HostAudioSettings for OutputVolume {
    fn output_volume(&self) -> OutputVolume {
        *self
    }
}

/// Host state consulted once per frame by [`Session`](crate::session::Session).
pub trait HostSignals {
    /// A world/session is loaded, as opposed to sitting in a menu.
    fn in_session(&self) -> bool;

    fn is_paused(&self) -> bool;

    /// Stop whatever music the host itself is playing. Called every
    /// in-session frame when host music replacement is on.
    fn silence_host_music(&self) {}
}
