use std::path::PathBuf;

use serde::Deserialize;

use super::load::default_data_dir;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/interlude/config.toml` or `~/.config/interlude/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `INTERLUDE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scheduler: SchedulerSettings,
    pub library: LibrarySettings,
    pub storage: StorageSettings,
    pub mixer: MixerSettings,
    pub host: HostSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Silent ticks before ambient music is started automatically.
    pub min_ticks_between_music: u32,
    /// Ticks after a track starts before the scheduler polls for its end.
    /// Covers backend startup latency.
    pub min_ticks_before_check: u32,
    /// Host tick cadence. Only the console runtime uses it directly.
    pub tick_rate_hz: u32,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        // ~10 minutes and ~3 seconds at 20 ticks per second.
        Self {
            min_ticks_between_music: 12_000,
            min_ticks_before_check: 60,
            tick_rate_hz: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Folder scanned for tracks. Created on first scan if missing.
    pub music_dir: PathBuf,
    /// File extensions to treat as tracks (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            music_dir: default_data_dir().join("music"),
            extensions: vec!["ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// One JSON file per playlist lives here.
    pub playlist_dir: PathBuf,
    /// Plain-text file holding the name of the last active playlist.
    pub active_playlist_file: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let data = default_data_dir();
        Self {
            playlist_dir: data.join("playlists"),
            active_playlist_file: data.join("active_playlist.txt"),
        }
    }
}

/// Initial host mixer levels for the console runtime.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MixerSettings {
    pub music: f32,
    pub master: f32,
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            music: 1.0,
            master: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Silence the host's own music every frame while in a session.
    pub replace_host_music: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            replace_host_music: true,
        }
    }
}
