//! Audio output: a dedicated thread owning the `rodio` stream.
//!
//! `AudioPlayer` is the queue's `Transport`; the thread reports natural
//! ends back as `AudioEvent`s.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioEvent, PlaybackHandle};
