use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::config::AudioSettings;
use crate::error::AudioError;
use crate::library::TrackId;

use super::sink::create_sink_at;
use super::types::{AudioCmd, AudioEvent, PlaybackHandle};

/// Sleep per step and step count for a fade of `total_ms` in `steps` steps.
pub(super) fn fade_schedule(total_ms: u64, steps: u64) -> (u64, Duration) {
    let steps = steps.max(1);
    (steps, Duration::from_millis((total_ms / steps).max(1)))
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<AudioEvent>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let e = AudioError::from(e);
                error!(error = %e, "playback disabled");
                // Keep accepting commands so senders never block or fail.
                while let Ok(cmd) = rx.recv() {
                    if matches!(cmd, AudioCmd::Quit { .. }) {
                        break;
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut engine = Engine::new(&stream, events, playback_info, audio_settings);

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    engine.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => engine.handle(cmd),
                // periodic check for natural end-of-track
                Err(RecvTimeoutError::Timeout) => engine.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

struct Engine<'a> {
    stream: &'a OutputStream,
    events: Sender<AudioEvent>,
    playback_info: PlaybackHandle,
    settings: AudioSettings,

    sink: Option<Sink>,
    current: Option<(TrackId, PathBuf)>,
    // Play-through the queue will expect in our end report.
    generation: u64,
    paused: bool,
    // End already reported for the current load.
    ended: bool,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl<'a> Engine<'a> {
    fn new(
        stream: &'a OutputStream,
        events: Sender<AudioEvent>,
        playback_info: PlaybackHandle,
        settings: AudioSettings,
    ) -> Self {
        Self {
            stream,
            events,
            playback_info,
            settings,
            sink: None,
            current: None,
            generation: 0,
            paused: true,
            ended: false,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load {
                id,
                path,
                start_playing,
                generation,
            } => self.load(id, path, start_playing, generation),
            AudioCmd::Resume => self.resume(),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Rewind { generation } => self.rewind(generation),
            AudioCmd::Stop => self.stop(),
            AudioCmd::Quit { .. } => {}
        }
    }

    fn open(&mut self, id: TrackId, path: &Path, generation: u64) -> Option<Sink> {
        match create_sink_at(self.stream, path, Duration::ZERO) {
            Ok(sink) => Some(sink),
            Err(e) => {
                warn!(error = %e, "track unplayable");
                self.stop();
                let _ = self.events.send(AudioEvent::Unplayable { id, generation });
                None
            }
        }
    }

    fn load(&mut self, id: TrackId, path: PathBuf, start_playing: bool, generation: u64) {
        debug!(%id, path = %path.display(), start_playing, generation, "load");
        let Some(new_sink) = self.open(id, &path, generation) else {
            return;
        };
        // Keep the default volume sane even if crossfade is disabled.
        new_sink.set_volume(1.0);

        if let Some(old_sink) = self.sink.take() {
            let audible = !self.paused && !self.ended;
            if start_playing && audible && self.settings.crossfade_ms > 0 {
                self.crossfade(&old_sink, &new_sink);
            }
            old_sink.stop();
        }

        if start_playing {
            new_sink.play();
            self.started_at = Some(Instant::now());
        } else {
            self.started_at = None;
        }

        self.sink = Some(new_sink);
        self.current = Some((id, path));
        self.generation = generation;
        self.paused = !start_playing;
        self.ended = false;
        self.accumulated = Duration::ZERO;
        self.publish();
    }

    fn crossfade(&self, old_sink: &Sink, new_sink: &Sink) {
        let (steps, step) =
            fade_schedule(self.settings.crossfade_ms, self.settings.crossfade_steps);
        old_sink.set_volume(1.0);
        new_sink.set_volume(0.0);
        new_sink.play();

        // Fade volumes in a short blocking loop; audio continues in rodio's mixer thread.
        for i in 1..=steps {
            let t = (i as f32) / (steps as f32);
            old_sink.set_volume(1.0 - t);
            new_sink.set_volume(t);
            thread::sleep(step);
        }
    }

    fn resume(&mut self) {
        let Some(ref sink) = self.sink else {
            return;
        };
        if self.paused {
            sink.play();
            self.paused = false;
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        let Some(ref sink) = self.sink else {
            return;
        };
        if !self.paused {
            sink.pause();
            self.paused = true;
            self.accumulated = self.elapsed();
            self.started_at = None;
            self.publish();
        }
    }

    fn rewind(&mut self, generation: u64) {
        let Some((id, path)) = self.current.clone() else {
            return;
        };
        let Some(new_sink) = self.open(id, &path, generation) else {
            return;
        };

        if let Some(old_sink) = self.sink.take() {
            old_sink.stop();
        }
        if self.paused {
            self.started_at = None;
        } else {
            new_sink.play();
            self.started_at = Some(Instant::now());
        }

        self.sink = Some(new_sink);
        self.generation = generation;
        self.ended = false;
        self.accumulated = Duration::ZERO;
        self.publish();
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.current = None;
        self.paused = true;
        self.ended = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.publish();
    }

    fn tick(&mut self) {
        let drained = self
            .sink
            .as_ref()
            .is_some_and(|s| !self.paused && !self.ended && s.empty());

        if drained {
            self.ended = true;
            self.accumulated = self.elapsed();
            self.started_at = None;
            if let Some((id, _)) = self.current {
                let generation = self.generation;
                debug!(%id, generation, "track ended");
                let _ = self.events.send(AudioEvent::Ended { id, generation });
            }
        }
        self.publish();
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(ref sink) = self.sink {
            if !self.paused {
                fade_out_sink(sink, fade_out_ms);
            }
        }
        self.stop();
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn publish(&self) {
        if let Ok(mut info) = self.playback_info.lock() {
            info.track = self.current.as_ref().map(|(id, _)| *id);
            info.elapsed = self.elapsed();
        }
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let (steps, step) = fade_schedule(fade_out_ms, 20);
    sink.set_volume(1.0);
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(step);
    }
    sink.set_volume(0.0);
}
