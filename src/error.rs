//! Error types for interlude.
//!
//! Every failure here is recoverable: the scheduler logs it and degrades to
//! "nothing is playing" rather than propagating it to the host.

use std::path::PathBuf;

use thiserror::Error;

use crate::audio::SourceId;

/// Failure to get a track into the native audio handle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("backend could not allocate {0}")]
    BackendResource(String),
}

/// Failure reported by the native backend outside of loading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("unknown source handle {0:?}")]
    UnknownSource(SourceId),

    #[error("audio device error: {0}")]
    Device(String),
}

/// Failure reading or writing playlist state.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed playlist file {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Main error type for interlude
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("playlist {0:?} has no playable tracks")]
    EmptyPlaylist(String),

    #[error("no playlist named {0:?}")]
    UnknownPlaylist(String),

    #[error("no track named {0:?}")]
    UnknownTrack(String),

    #[error("a playlist named {0:?} already exists")]
    DuplicatePlaylist(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

/// Result type alias for interlude
pub type Result<T> = std::result::Result<T, Error>;
