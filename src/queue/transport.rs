use crate::library::Track;

/// Whatever actually produces sound for the queue.
///
/// Calls are fire-and-forget: the queue never waits for the transport and
/// never learns about its failures, except through `track_finished`.
///
/// Every call that starts a fresh play-through carries a `generation`; the
/// transport must echo it back when that play-through ends.
pub trait Transport {
    /// Replace the current item with `track`, positioned at its start.
    fn load(&mut self, track: &Track, start_playing: bool, generation: u64);
    fn resume(&mut self);
    fn pause(&mut self);
    /// Seek the current item back to its start, keeping play/pause as is.
    fn rewind(&mut self, generation: u64);
    /// Drop the current item.
    fn stop(&mut self);
}
