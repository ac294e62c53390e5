//! Playlists: the next-track algorithm, the manager that owns them, and the
//! store that persists them.

mod manager;
mod model;
mod store;

pub use manager::PlaylistManager;
pub use model::Playlist;
pub use store::{JsonPlaylistStore, PlaylistStore, file_name_for};

#[cfg(test)]
mod tests;
