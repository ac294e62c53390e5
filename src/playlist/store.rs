//! Durable playlist state.
//!
//! One pretty-printed JSON file per playlist, named after the playlist with
//! anything outside `[A-Za-z0-9_]` replaced by `_`, plus a plain-text file
//! holding the active playlist name.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::StorageSettings;
use crate::error::PersistenceError;

use super::model::Playlist;

/// Persistence seam for playlists and the active-playlist pointer.
pub trait PlaylistStore {
    /// Every readable playlist. Unreadable files are logged and skipped.
    fn load_all(&self) -> Result<Vec<Playlist>, PersistenceError>;

    fn save(&self, playlist: &Playlist) -> Result<(), PersistenceError>;

    /// Removing a playlist that was never saved is not an error.
    fn delete(&self, name: &str) -> Result<(), PersistenceError>;

    fn load_active_name(&self) -> Result<Option<String>, PersistenceError>;

    /// `None` clears the pointer.
    fn save_active_name(&self, name: Option<&str>) -> Result<(), PersistenceError>;
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// File name a playlist is stored under.
pub fn file_name_for(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{stem}.json")
}

#[derive(Debug, Clone)]
pub struct JsonPlaylistStore {
    dir: PathBuf,
    active_file: PathBuf,
}

impl JsonPlaylistStore {
    pub fn new(dir: impl Into<PathBuf>, active_file: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            active_file: active_file.into(),
        }
    }

    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(&settings.playlist_dir, &settings.active_playlist_file)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(file_name_for(name))
    }

    fn read_playlist(path: &Path) -> Result<Playlist, PersistenceError> {
        let text = fs::read_to_string(path).map_err(io_err(path))?;
        serde_json::from_str(&text).map_err(|source| PersistenceError::Format {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl PlaylistStore for JsonPlaylistStore {
    fn load_all(&self) -> Result<Vec<Playlist>, PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)
            .map_err(io_err(&self.dir))?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut playlists = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::read_playlist(&path) {
                Ok(p) => {
                    debug!(playlist = p.name(), "read playlist");
                    playlists.push(p);
                }
                Err(e) => warn!(error = %e, "skipping unreadable playlist"),
            }
        }
        Ok(playlists)
    }

    fn save(&self, playlist: &Playlist) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let path = self.path_for(playlist.name());
        let json = serde_json::to_string_pretty(playlist).map_err(|source| {
            PersistenceError::Format {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, json).map_err(io_err(&path))
    }

    fn delete(&self, name: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    fn load_active_name(&self) -> Result<Option<String>, PersistenceError> {
        let path = &self.active_file;
        match fs::read_to_string(path) {
            Ok(text) => {
                let name = text.trim();
                Ok((!name.is_empty()).then(|| name.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(path)(e)),
        }
    }

    fn save_active_name(&self, name: Option<&str>) -> Result<(), PersistenceError> {
        let path = &self.active_file;
        match name {
            Some(name) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(io_err(parent))?;
                }
                fs::write(path, name).map_err(io_err(path))
            }
            None => match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_err(path)(e)),
            },
        }
    }
}
