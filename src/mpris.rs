//! MPRIS media session.
//!
//! Publishes now-playing state on the session bus and turns external
//! transport controls into `ControlCmd`s for the runtime.

use std::collections::HashMap;
use std::sync::mpsc::{self, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::{Connection, ObjectServer, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::queue::{PlaybackState, QueueSnapshot};

const MPRIS_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.cdcase";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    has_queue: bool,
    has_next: bool,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    track_number: Option<u32>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    /// Mirror a queue snapshot into the published properties.
    pub fn set_now_playing(&self, snapshot: &QueueSnapshot) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = snapshot.state;
            s.has_queue = snapshot.has_queue();
            s.has_next = snapshot.has_next();

            let track = snapshot.current.as_ref();
            s.title = track.map(|t| t.title.clone());
            s.artist = track.map(|t| vec![t.artist.clone()]).unwrap_or_default();
            s.album = track.map(|t| t.album.clone());
            s.track_number = track.and_then(|t| t.track_number);
            // Relative paths have no file URL; the key is left out for them.
            s.url = track
                .and_then(|t| url::Url::from_file_path(&t.path).ok())
                .map(String::from);
            s.length_micros = track
                .and_then(|t| t.duration)
                .map(|d| d.as_micros() as i64);
            s.track_id = track.and_then(|t| {
                ObjectPath::try_from(format!("{MPRIS_PATH}/track/{}", t.id))
                    .ok()
                    .map(OwnedObjectPath::from)
            });
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "cdcase"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn with_state<R>(&self, f: impl FnOnce(&SharedState) -> R, fallback: R) -> R {
        self.state.lock().map(|s| f(&*s)).unwrap_or(fallback)
    }
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let playback = self.with_state(|s| s.playback, PlaybackState::Stopped);
        match playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        self.with_state(|s| s.has_queue, false)
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        self.with_state(|s| s.has_queue, false)
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        self.with_state(|s| s.has_next, false)
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        // Previous on the first track rewinds it, so it is always available.
        self.with_state(|s| s.has_queue, false)
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Option<OwnedValue>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };

        put(
            "mpris:trackid",
            s.track_id
                .clone()
                .and_then(|p| owned(Value::from(p.into_inner()))),
        );
        put(
            "xesam:title",
            s.title.clone().and_then(|t| owned(Value::from(t))),
        );
        if !s.artist.is_empty() {
            put("xesam:artist", owned(Value::from(s.artist.clone())));
        }
        put(
            "xesam:album",
            s.album.clone().and_then(|a| owned(Value::from(a))),
        );
        put(
            "xesam:trackNumber",
            s.track_number.and_then(|n| owned(Value::from(n as i32))),
        );
        put("xesam:url", s.url.clone().and_then(|u| owned(Value::from(u))));
        put(
            "mpris:length",
            s.length_micros.and_then(|l| owned(Value::from(l))),
        );
        map
    }
}

async fn emit_player_changed(server: &ObjectServer) -> zbus::Result<()> {
    let iface_ref = server.interface::<_, PlayerIface>(MPRIS_PATH).await?;
    let emitter = iface_ref.signal_emitter();
    let iface = iface_ref.get().await;
    iface.playback_status_changed(emitter).await?;
    iface.metadata_changed(emitter).await?;
    iface.can_play_changed(emitter).await?;
    iface.can_pause_changed(emitter).await?;
    iface.can_go_next_changed(emitter).await?;
    iface.can_go_previous_changed(emitter).await?;
    Ok(())
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(MPRIS_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    MPRIS_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }

            debug!("MPRIS: registered {BUS_NAME}");

            // Coalesce bursts of updates into one PropertiesChanged round.
            loop {
                Timer::after(Duration::from_millis(100)).await;

                let mut dirty = false;
                loop {
                    match notify_rx.try_recv() {
                        Ok(()) => dirty = true,
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => return,
                    }
                }

                if dirty {
                    if let Err(e) = emit_player_changed(&object_server).await {
                        debug!(error = %e, "MPRIS: failed to emit PropertiesChanged");
                    }
                }
            }
        });
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

#[cfg(test)]
mod tests;
