use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, trace};

use crate::library::{Track, TrackId};

use super::transport::Transport;

/// Coarse playback state as seen by observers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing is loaded.
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What observers get after every change to the queue.
#[derive(Clone, Debug, Default)]
pub struct QueueSnapshot {
    pub current: Option<Track>,
    pub position: Option<usize>,
    pub len: usize,
    pub state: PlaybackState,
}

impl QueueSnapshot {
    pub fn has_queue(&self) -> bool {
        self.len > 0
    }

    pub fn has_next(&self) -> bool {
        self.position.is_some_and(|p| p + 1 < self.len)
    }
}

/// Sequential playback over a snapshot of an album's tracks.
///
/// Invariant: `cursor` is `Some(i)` with `i < tracks.len()` exactly when the
/// queue is non-empty. Operations that make no sense in the current state are
/// no-ops.
pub struct PlaybackQueue<T: Transport> {
    tracks: Vec<Track>,
    cursor: Option<usize>,
    state: PlaybackState,
    // The last track ran to its end; the transport holds nothing playable.
    exhausted: bool,
    // Bumped on every load or rewind; end reports must carry the current one.
    generation: u64,
    transport: T,
    subscribers: Vec<Sender<QueueSnapshot>>,
}

impl<T: Transport> PlaybackQueue<T> {
    pub fn new(transport: T) -> Self {
        Self {
            tracks: Vec::new(),
            cursor: None,
            state: PlaybackState::Stopped,
            exhausted: false,
            generation: 0,
            transport,
            subscribers: Vec::new(),
        }
    }

    /// Receive a `QueueSnapshot` after every change. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<QueueSnapshot> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Replace the queue with `tracks` and play from the first one.
    pub fn start(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.exhausted = false;
        if self.tracks.is_empty() {
            debug!("start with no tracks, queue cleared");
            self.cursor = None;
            self.state = PlaybackState::Stopped;
            self.transport.stop();
        } else {
            debug!(len = self.tracks.len(), "queue started");
            self.move_to(0, true);
        }
        self.emit();
    }

    pub fn play(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        if self.state == PlaybackState::Playing {
            return;
        }

        if self.exhausted {
            self.exhausted = false;
            let generation = self.next_generation();
            self.transport.load(&self.tracks[cursor], true, generation);
        } else {
            self.transport.resume();
        }
        self.state = PlaybackState::Playing;
        self.emit();
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.transport.pause();
        self.state = PlaybackState::Paused;
        self.emit();
    }

    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.play(),
            PlaybackState::Stopped => {}
        }
    }

    /// Skip to the next track. Stays put on the last one.
    pub fn advance(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        if cursor + 1 >= self.tracks.len() {
            trace!("advance on last track ignored");
            return;
        }
        self.move_to(cursor + 1, self.state == PlaybackState::Playing);
        self.emit();
    }

    /// Go back one track and play it, or rewind the first track.
    pub fn retreat(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };

        if cursor > 0 {
            self.move_to(cursor - 1, true);
        } else if self.exhausted {
            // Single-track queue that already ended: bring it back at its start.
            self.exhausted = false;
            let generation = self.next_generation();
            self.transport.load(&self.tracks[cursor], false, generation);
        } else {
            let generation = self.next_generation();
            self.transport.rewind(generation);
        }
        self.emit();
    }

    /// The transport reports that play-through `generation` of `id` ended on
    /// its own.
    ///
    /// Reports for anything but the current play-through of the current track
    /// are stale and ignored, so each natural end moves the cursor at most
    /// once. A restart of the same track counts as a new play-through.
    pub fn track_finished(&mut self, id: TrackId, generation: u64) {
        let Some(cursor) = self.cursor else {
            return;
        };
        if self.exhausted || generation != self.generation || self.tracks[cursor].id != id {
            debug!(%id, generation, current = self.generation, "ignoring stale end-of-track");
            return;
        }

        if cursor + 1 < self.tracks.len() {
            self.move_to(cursor + 1, self.state == PlaybackState::Playing);
        } else {
            debug!("reached end of queue");
            self.exhausted = true;
            self.state = PlaybackState::Paused;
        }
        self.emit();
    }

    pub fn current(&self) -> Option<&Track> {
        self.cursor.map(|i| &self.tracks[i])
    }

    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            current: self.current().cloned(),
            position: self.cursor,
            len: self.tracks.len(),
            state: self.state,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn move_to(&mut self, index: usize, playing: bool) {
        self.cursor = Some(index);
        self.exhausted = false;
        self.state = if playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        let generation = self.next_generation();
        self.transport.load(&self.tracks[index], playing, generation);
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn emit(&mut self) {
        let snapshot = self.snapshot();
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}
