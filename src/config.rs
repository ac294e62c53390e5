//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive the scheduler, the track
//! scanner and the playlist store, plus helpers to load them from disk.

mod load;
mod schema;

pub use load::{default_config_path, default_data_dir, resolve_config_path};
pub use schema::*;
