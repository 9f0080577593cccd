//! UI-facing model: the library with an album pane and a track pane.

mod model;

pub use model::{App, Focus};
