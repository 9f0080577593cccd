//! Settings for audio, UI, library scanning, the source store and logging.
//!
//! Values come from an optional TOML file and `CDCASE__*` environment
//! variables, over built-in defaults.

mod load;
mod schema;

pub use schema::{
    AudioSettings, LibrarySettings, Settings, TimeField, TrackDisplayField, UiSettings,
};
