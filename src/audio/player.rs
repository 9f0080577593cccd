use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::config::AudioSettings;
use crate::library::Track;
use crate::queue::Transport;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioEvent, PlaybackHandle, PlaybackInfo};

/// Front end of the audio thread. Cheap to call from the UI thread; every
/// method only posts a command.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Natural ends and unplayable files are
    /// reported on the returned receiver.
    pub fn new(audio_settings: AudioSettings) -> (Self, Receiver<AudioEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<AudioEvent>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, event_tx, playback_info.clone(), audio_settings);

        let player = Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        };
        (player, event_rx)
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(cmd = ?e.0, "audio thread is gone");
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Transport for AudioPlayer {
    fn load(&mut self, track: &Track, start_playing: bool, generation: u64) {
        self.send(AudioCmd::Load {
            id: track.id,
            path: track.path.clone(),
            start_playing,
            generation,
        });
    }

    fn resume(&mut self) {
        self.send(AudioCmd::Resume);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn rewind(&mut self, generation: u64) {
        self.send(AudioCmd::Rewind { generation });
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }
}
