//! Album playback queue.
//!
//! `PlaybackQueue` is a small state machine over a snapshot of tracks and a
//! cursor. It drives a `Transport` and broadcasts a `QueueSnapshot` to
//! subscribers after each change; the UI and the media session only ever
//! look at those snapshots.

mod state;
mod transport;

pub use state::{PlaybackQueue, PlaybackState, QueueSnapshot};
pub use transport::Transport;

#[cfg(test)]
mod tests;
