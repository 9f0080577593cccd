use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::audio::{AudioEvent, AudioPlayer};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::queue::{PlaybackQueue, QueueSnapshot};
use crate::runtime::mpris_sync::sync_now_playing;
use crate::ui;

/// Channels the loop drains every iteration.
pub struct Inbox<'a> {
    pub control_tx: &'a Sender<ControlCmd>,
    pub control_rx: &'a Receiver<ControlCmd>,
    pub audio_events: &'a Receiver<AudioEvent>,
    pub snapshots: &'a Receiver<QueueSnapshot>,
}

/// Main terminal event loop: handles input, UI drawing, and sync with the
/// audio thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    queue: &mut PlaybackQueue<AudioPlayer>,
    mpris: &MprisHandle,
    inbox: &Inbox<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = inbox.audio_events.try_recv() {
            handle_audio_event(ev, queue);
        }

        while let Ok(cmd) = inbox.control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, queue) {
                return Ok(());
            }
        }

        sync_now_playing(app, mpris, inbox.snapshots);

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, queue, inbox.control_tx) {
                    return Ok(());
                }
            }
        }
    }
}

fn handle_audio_event(ev: AudioEvent, queue: &mut PlaybackQueue<AudioPlayer>) {
    match ev {
        AudioEvent::Ended { id, generation } => {
            debug!(track = %id, generation, "track ended");
            queue.track_finished(id, generation);
        }
        AudioEvent::Unplayable { id, generation } => {
            // Skip over it as if it had played through.
            warn!(track = %id, generation, "track could not be played, skipping");
            queue.track_finished(id, generation);
        }
    }
}

fn quit(settings: &config::Settings, queue: &PlaybackQueue<AudioPlayer>) {
    info!("shutting down");
    queue
        .transport()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
}

/// Apply a transport command from the keyboard or the media session.
/// Returns true when the app should exit.
fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    queue: &mut PlaybackQueue<AudioPlayer>,
) -> bool {
    debug!(?cmd, state = ?queue.state(), position = ?queue.position(), "control command");
    match cmd {
        ControlCmd::Quit => {
            quit(settings, queue);
            return true;
        }
        ControlCmd::Play => queue.play(),
        // There is no stopped-with-queue state; Stop holds the position like Pause.
        ControlCmd::Pause | ControlCmd::Stop => queue.pause(),
        ControlCmd::PlayPause => queue.toggle(),
        ControlCmd::Next => queue.advance(),
        ControlCmd::Prev => queue.retreat(),
    }
    false
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    queue: &mut PlaybackQueue<AudioPlayer>,
    control_tx: &Sender<ControlCmd>,
) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            quit(settings, queue);
            return true;
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Tab => {
            if app.has_albums() {
                app.toggle_focus();
            }
        }
        KeyCode::Enter => {
            if let Some(album) = app.selected_album() {
                info!(album = %album.title, artist = %album.artist, "playing album");
                queue.start(album.tracks.clone());
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('d') => {
            if let Some(track) = app.remove_selected_track() {
                info!(path = %track.path.display(), "removed track from library");
            }
        }
        _ => {}
    }
    false
}
