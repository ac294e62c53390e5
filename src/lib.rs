//! Tick-driven background music: a scanned track catalog, persistent
//! playlists, a single native audio handle and a scheduler that decides on
//! every host tick whether to advance, start ambient music or hold.

pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod playlist;
pub mod scheduler;
pub mod session;

pub use error::{Error, Result};
