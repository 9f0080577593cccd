//! Music library: imported tracks, derived albums and the import pipeline.

mod collection;
mod display;
mod import;
mod metadata;
mod model;
mod organize;

pub use collection::Library;
pub use display::display_from_fields;
pub use import::Importer;
pub use model::{Album, AlbumId, Track, TrackId};
