use super::*;
use crate::library::{Track, TrackId};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

fn make_track() -> Track {
    Track {
        id: TrackId::new(),
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        track_number: Some(7),
        artwork: None,
        path: PathBuf::from("/tmp/music/test.mp3"),
        duration: Some(Duration::from_micros(1_234_567)),
    }
}

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>, mpsc::Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
    };
    (handle, state, notify_rx)
}

#[test]
fn set_now_playing_sets_and_clears_shared_state() {
    let (handle, state, notify_rx) = handle();
    let track = make_track();

    handle.set_now_playing(&QueueSnapshot {
        current: Some(track.clone()),
        position: Some(0),
        len: 2,
        state: PlaybackState::Playing,
    });

    {
        let s = state.lock().unwrap();
        assert_eq!(s.playback, PlaybackState::Playing);
        assert!(s.has_queue);
        assert!(s.has_next);
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert_eq!(s.track_number, Some(7));
        assert_eq!(s.url.as_deref(), Some("file:///tmp/music/test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str().to_string()),
            Some(format!("/org/mpris/MediaPlayer2/track/{}", track.id))
        );
    }
    assert!(notify_rx.try_recv().is_ok());

    handle.set_now_playing(&QueueSnapshot::default());
    {
        let s = state.lock().unwrap();
        assert_eq!(s.playback, PlaybackState::Stopped);
        assert!(!s.has_queue);
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn url_escapes_reserved_characters_in_the_path() {
    let (handle, state, _notify_rx) = handle();
    let mut track = make_track();
    track.path = PathBuf::from("/tmp/my music/a#b?.mp3");

    handle.set_now_playing(&QueueSnapshot {
        current: Some(track),
        position: Some(0),
        len: 1,
        state: PlaybackState::Paused,
    });

    let s = state.lock().unwrap();
    assert_eq!(
        s.url.as_deref(),
        Some("file:///tmp/my%20music/a%23b%3F.mp3")
    );
}

#[test]
fn relative_path_has_no_url() {
    let (handle, state, _notify_rx) = handle();
    let mut track = make_track();
    track.path = PathBuf::from("music/test.mp3");

    handle.set_now_playing(&QueueSnapshot {
        current: Some(track),
        position: Some(0),
        len: 1,
        state: PlaybackState::Paused,
    });

    assert_eq!(state.lock().unwrap().url, None);
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().playback = PlaybackState::Playing;
    assert_eq!(iface.playback_status(), "Playing");

    state.lock().unwrap().playback = PlaybackState::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn navigation_capabilities_follow_queue_position() {
    let (handle, state, _notify_rx) = handle();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    assert!(!iface.can_play());
    assert!(!iface.can_go_previous());

    handle.set_now_playing(&QueueSnapshot {
        current: Some(make_track()),
        position: Some(1),
        len: 2,
        state: PlaybackState::Paused,
    });
    assert!(iface.can_play());
    assert!(iface.can_go_previous());
    assert!(!iface.can_go_next());
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, state, _notify_rx) = handle();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    assert!(iface.metadata().is_empty());

    handle.set_now_playing(&QueueSnapshot {
        current: Some(make_track()),
        position: Some(0),
        len: 1,
        state: PlaybackState::Playing,
    });

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:trackNumber",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn transport_methods_forward_control_commands() {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: Arc::new(Mutex::new(SharedState::default())),
    };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Stop
        ]
    );
}
