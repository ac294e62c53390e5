//! Track catalog: the known tracks, how they are discovered on disk, and the
//! snapshot handle the scheduler resolves track names against.

mod catalog;
mod model;
mod scan;

pub use catalog::{Catalog, TrackLookup};
pub use model::Track;
pub use scan::{scan, spawn_scan};
