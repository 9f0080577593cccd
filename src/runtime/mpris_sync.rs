use std::sync::mpsc::Receiver;

use crate::app::App;
use crate::mpris::MprisHandle;
use crate::queue::QueueSnapshot;

/// Hand every pending queue snapshot to the UI model and the media session.
pub fn sync_now_playing(app: &mut App, mpris: &MprisHandle, snapshots: &Receiver<QueueSnapshot>) {
    // Only the newest snapshot matters for display.
    if let Some(latest) = snapshots.try_iter().last() {
        mpris.set_now_playing(&latest);
        app.set_now_playing(latest);
    }
}
