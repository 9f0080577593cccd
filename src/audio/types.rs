//! Audio-related small types and handles.
//!
//! Commands flow into the audio thread, events flow back out, and the
//! elapsed-time snapshot is shared through `PlaybackHandle`.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::TrackId;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current sink with `path`, positioned at its start.
    Load {
        id: TrackId,
        path: PathBuf,
        start_playing: bool,
        generation: u64,
    },
    Resume,
    Pause,
    /// Restart the current track from zero, keeping play/pause.
    Rewind { generation: u64 },
    /// Drop the current sink.
    Stop,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Sent by the audio thread when a loaded track stops producing sound on its own.
///
/// `generation` is the one given with the `Load` or `Rewind` that started the
/// play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    /// The track played to its end.
    Ended { id: TrackId, generation: u64 },
    /// The track could not be opened or decoded.
    Unplayable { id: TrackId, generation: u64 },
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Track currently held by the audio thread (if any).
    pub track: Option<TrackId>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
