use super::*;
use crate::library::{Library, Track, TrackId};
use crate::queue::QueueSnapshot;
use ratatui::{Terminal, backend::TestBackend};
use std::path::PathBuf;

fn track(title: &str, n: u32) -> Track {
    Track {
        id: TrackId::new(),
        title: title.into(),
        artist: "Band".into(),
        album: "Record".into(),
        track_number: Some(n),
        artwork: None,
        path: PathBuf::from(format!("/music/{title}.flac")),
        duration: Some(Duration::from_secs(185)),
    }
}

fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
    terminal
        .draw(|f| draw(f, app, &UiSettings::default()))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn format_mmss_pads_minutes_and_seconds() {
    assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
    assert_eq!(format_mmss(Duration::from_secs(185)), "03:05");
}

#[test]
fn time_text_follows_configured_fields() {
    let mut ui = UiSettings::default();
    ui.now_playing_time_fields = vec![TimeField::Elapsed, TimeField::Remaining];
    let text = now_playing_time_text(
        Duration::from_secs(65),
        Some(Duration::from_secs(185)),
        &ui,
    );
    assert_eq!(text.as_deref(), Some("01:05 / -02:00"));

    ui.now_playing_time_fields = vec![TimeField::Total];
    assert_eq!(now_playing_time_text(Duration::ZERO, None, &ui), None);
}

#[test]
fn empty_library_shows_placeholder() {
    let screen = render(&App::new(Library::new()));
    assert!(screen.contains("No Albums"));
    assert!(screen.contains("Import tracks to build your library."));
}

#[test]
fn albums_and_now_playing_are_rendered() {
    let first = track("Opening", 1);
    let mut lib = Library::new();
    lib.import_tracks(vec![first.clone(), track("Closing", 2)]);
    let mut app = App::new(lib);
    app.set_now_playing(QueueSnapshot {
        current: Some(first),
        position: Some(0),
        len: 2,
        state: PlaybackState::Playing,
    });

    let screen = render(&app);
    assert!(screen.contains("Band - Record (2)"));
    assert!(screen.contains("Opening"));
    assert!(screen.contains("Closing"));
    assert!(screen.contains("Now: Band - Opening - Record [00:00 / 03:05]"));
    assert!(screen.contains("Track 1/2"));
    assert!(!screen.contains("No Albums"));
}
