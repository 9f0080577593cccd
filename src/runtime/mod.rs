use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::library::Library;
use crate::mpris::ControlCmd;
use crate::queue::PlaybackQueue;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    if let Err(e) = logging::init_logging(&settings) {
        eprintln!("cdcase: logging disabled: {e}");
    }

    let args = startup::StartupArgs::parse(env::args().skip(1));
    let mut app = App::new(Library::new());
    let added = app.import_tracks(startup::load_tracks(&settings, &args));
    info!(
        added,
        tracks = app.library.tracks().len(),
        albums = app.library.albums().len(),
        "library loaded"
    );

    let (audio_player, audio_events) = AudioPlayer::new(settings.audio.clone());
    app.set_playback_handle(audio_player.playback_handle());

    let mut queue = PlaybackQueue::new(audio_player);
    let snapshots = queue.subscribe();

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());
    mpris.set_now_playing(&queue.snapshot());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let inbox = event_loop::Inbox {
        control_tx: &control_tx,
        control_rx: &control_rx,
        audio_events: &audio_events,
        snapshots: &snapshots,
    };
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut queue,
        &mpris,
        &inbox,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
