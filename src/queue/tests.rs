use std::path::PathBuf;

use proptest::prelude::*;

use super::*;
use crate::library::{Track, TrackId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Load(TrackId, bool),
    Resume,
    Pause,
    Rewind,
    Stop,
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
    // Generation of the latest load or rewind, as an audio backend would echo it.
    generation: u64,
}

impl Transport for Recorder {
    fn load(&mut self, track: &Track, start_playing: bool, generation: u64) {
        self.generation = generation;
        self.calls.push(Call::Load(track.id, start_playing));
    }
    fn resume(&mut self) {
        self.calls.push(Call::Resume);
    }
    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }
    fn rewind(&mut self, generation: u64) {
        self.generation = generation;
        self.calls.push(Call::Rewind);
    }
    fn stop(&mut self) {
        self.calls.push(Call::Stop);
    }
}

fn t(title: &str) -> Track {
    Track {
        id: TrackId::new(),
        title: title.into(),
        artist: "Artist".into(),
        album: "Album".into(),
        track_number: None,
        artwork: None,
        path: PathBuf::from(format!("/music/{title}.mp3")),
        duration: None,
    }
}

fn queue_of(n: usize) -> (PlaybackQueue<Recorder>, Vec<Track>) {
    let tracks: Vec<Track> = (1..=n).map(|i| t(&format!("T{i}"))).collect();
    let mut q = PlaybackQueue::new(Recorder::default());
    q.start(tracks.clone());
    (q, tracks)
}

/// Report the natural end of `id` for the transport's latest play-through.
fn finish(q: &mut PlaybackQueue<Recorder>, id: TrackId) {
    let generation = q.transport().generation;
    q.track_finished(id, generation);
}

fn current_title<T: Transport>(q: &PlaybackQueue<T>) -> Option<&str> {
    q.current().map(|t| t.title.as_str())
}

#[test]
fn new_queue_is_empty_and_stopped() {
    let q = PlaybackQueue::new(Recorder::default());
    assert!(q.current().is_none());
    assert_eq!(q.position(), None);
    assert_eq!(q.state(), PlaybackState::Stopped);
    assert!(!q.snapshot().has_queue());
}

#[test]
fn start_plays_first_track() {
    let (q, tracks) = queue_of(3);
    assert_eq!(q.position(), Some(0));
    assert_eq!(q.state(), PlaybackState::Playing);
    assert_eq!(q.transport().calls, vec![Call::Load(tracks[0].id, true)]);
}

#[test]
fn start_with_no_tracks_clears_the_queue() {
    let (mut q, _) = queue_of(2);
    q.start(Vec::new());

    assert!(q.current().is_none());
    assert_eq!(q.state(), PlaybackState::Stopped);
    assert_eq!(q.transport().calls.last(), Some(&Call::Stop));
}

#[test]
fn advancing_past_the_end_stays_on_last_track() {
    let (mut q, _) = queue_of(3);
    q.advance();
    q.advance();
    assert_eq!(current_title(&q), Some("T3"));

    let calls_before = q.transport().calls.len();
    q.advance();
    assert_eq!(current_title(&q), Some("T3"));
    assert_eq!(q.position(), Some(2));
    assert_eq!(q.transport().calls.len(), calls_before);
}

#[test]
fn advance_keeps_paused_state() {
    let (mut q, tracks) = queue_of(2);
    q.pause();
    q.advance();

    assert_eq!(q.state(), PlaybackState::Paused);
    assert_eq!(
        q.transport().calls.last(),
        Some(&Call::Load(tracks[1].id, false))
    );
}

#[test]
fn retreat_at_start_only_rewinds() {
    let (mut q, tracks) = queue_of(3);
    q.retreat();

    assert_eq!(q.position(), Some(0));
    assert_eq!(current_title(&q), Some(tracks[0].title.as_str()));
    assert_eq!(q.state(), PlaybackState::Playing);
    assert_eq!(q.transport().calls.last(), Some(&Call::Rewind));
}

#[test]
fn retreat_moves_back_and_resumes_playing() {
    let (mut q, tracks) = queue_of(3);
    q.advance();
    q.pause();
    q.retreat();

    assert_eq!(q.position(), Some(0));
    assert_eq!(q.state(), PlaybackState::Playing);
    assert_eq!(
        q.transport().calls.last(),
        Some(&Call::Load(tracks[0].id, true))
    );
}

#[test]
fn play_and_pause_toggle_without_moving_cursor() {
    let (mut q, _) = queue_of(2);
    q.pause();
    assert_eq!(q.state(), PlaybackState::Paused);
    q.pause();
    q.play();
    assert_eq!(q.state(), PlaybackState::Playing);
    q.play();

    assert_eq!(q.position(), Some(0));
    assert_eq!(
        &q.transport().calls[1..],
        &[Call::Pause, Call::Resume][..]
    );
}

#[test]
fn operations_on_empty_queue_are_noops() {
    let mut q = PlaybackQueue::new(Recorder::default());
    let rx = q.subscribe();

    q.play();
    q.pause();
    q.toggle();
    q.advance();
    q.retreat();
    q.track_finished(TrackId::new(), 0);

    assert!(q.transport().calls.is_empty());
    assert_eq!(q.state(), PlaybackState::Stopped);
    assert!(rx.try_recv().is_err());
}

#[test]
fn natural_end_advances_to_next_track() {
    let (mut q, tracks) = queue_of(3);
    finish(&mut q, tracks[0].id);

    assert_eq!(q.position(), Some(1));
    assert_eq!(q.state(), PlaybackState::Playing);
    assert_eq!(
        q.transport().calls.last(),
        Some(&Call::Load(tracks[1].id, true))
    );
}

#[test]
fn stale_or_duplicate_end_reports_are_ignored() {
    let (mut q, tracks) = queue_of(3);
    finish(&mut q, tracks[0].id);
    finish(&mut q, tracks[0].id);
    finish(&mut q, TrackId::new());

    assert_eq!(q.position(), Some(1));
}

#[test]
fn end_report_from_before_a_rewind_is_ignored() {
    let (mut q, tracks) = queue_of(3);
    let first_play = q.transport().generation;
    q.retreat();
    assert_eq!(q.transport().calls.last(), Some(&Call::Rewind));

    // The first play-through's end was already in flight.
    q.track_finished(tracks[0].id, first_play);
    assert_eq!(q.position(), Some(0));
    assert_eq!(q.transport().calls.last(), Some(&Call::Rewind));

    finish(&mut q, tracks[0].id);
    assert_eq!(q.position(), Some(1));
}

#[test]
fn end_report_from_before_restarting_the_same_album_is_ignored() {
    let (mut q, tracks) = queue_of(2);
    let first_play = q.transport().generation;
    q.start(tracks.clone());

    q.track_finished(tracks[0].id, first_play);
    assert_eq!(q.position(), Some(0));
    assert_eq!(q.state(), PlaybackState::Playing);
}

#[test]
fn repeated_end_report_for_one_play_through_advances_once() {
    let (mut q, tracks) = queue_of(3);
    let generation = q.transport().generation;
    q.track_finished(tracks[0].id, generation);
    q.track_finished(tracks[0].id, generation);

    assert_eq!(q.position(), Some(1));
}

#[test]
fn natural_end_of_last_track_does_not_wrap() {
    let (mut q, tracks) = queue_of(2);
    q.advance();
    finish(&mut q, tracks[1].id);

    assert_eq!(q.position(), Some(1));
    assert_eq!(current_title(&q), Some("T2"));
    assert_eq!(q.state(), PlaybackState::Paused);

    // A repeated report after the end changes nothing.
    finish(&mut q, tracks[1].id);
    assert_eq!(q.position(), Some(1));
}

#[test]
fn play_after_queue_ended_restarts_last_track() {
    let (mut q, tracks) = queue_of(1);
    finish(&mut q, tracks[0].id);
    q.play();

    assert_eq!(q.state(), PlaybackState::Playing);
    assert_eq!(
        q.transport().calls.last(),
        Some(&Call::Load(tracks[0].id, true))
    );
}

#[test]
fn retreat_after_single_track_ended_reloads_it_paused() {
    let (mut q, tracks) = queue_of(1);
    finish(&mut q, tracks[0].id);
    q.retreat();

    assert_eq!(q.position(), Some(0));
    assert_eq!(q.state(), PlaybackState::Paused);
    assert_eq!(
        q.transport().calls.last(),
        Some(&Call::Load(tracks[0].id, false))
    );
}

#[test]
fn subscribers_get_a_snapshot_after_each_change() {
    let mut q = PlaybackQueue::new(Recorder::default());
    let rx = q.subscribe();
    let tracks = vec![t("A"), t("B")];

    q.start(tracks.clone());
    q.advance();
    q.pause();

    let seen: Vec<QueueSnapshot> = rx.try_iter().collect();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].current.as_ref().map(|t| t.id), Some(tracks[0].id));
    assert_eq!(seen[0].state, PlaybackState::Playing);
    assert!(seen[0].has_next());
    assert_eq!(seen[1].position, Some(1));
    assert!(!seen[1].has_next());
    assert_eq!(seen[2].state, PlaybackState::Paused);
    assert_eq!(seen[2].len, 2);
}

#[test]
fn dropped_subscribers_are_pruned() {
    let mut q = PlaybackQueue::new(Recorder::default());
    let rx = q.subscribe();
    drop(rx);
    let keep = q.subscribe();

    q.start(vec![t("A")]);
    assert_eq!(keep.try_iter().count(), 1);
}

#[test]
fn queue_is_a_copy_independent_of_later_library_changes() {
    let mut tracks = vec![t("A"), t("B")];
    let mut q = PlaybackQueue::new(Recorder::default());
    q.start(tracks.clone());
    tracks.clear();

    q.advance();
    assert_eq!(current_title(&q), Some("B"));
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Play,
    Pause,
    Advance,
    Retreat,
    FinishCurrent,
    Restart,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Play),
        Just(Op::Pause),
        Just(Op::Advance),
        Just(Op::Retreat),
        Just(Op::FinishCurrent),
        Just(Op::Restart),
    ]
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(len in 0usize..6, ops in prop::collection::vec(arb_op(), 0..60)) {
        let tracks: Vec<Track> = (0..len).map(|i| t(&format!("T{i}"))).collect();
        let mut q = PlaybackQueue::new(Recorder::default());
        q.start(tracks.clone());

        for op in ops {
            let before = q.position();
            match op {
                Op::Play => q.play(),
                Op::Pause => q.pause(),
                Op::Advance => q.advance(),
                Op::Retreat => q.retreat(),
                Op::FinishCurrent => {
                    if let Some(id) = q.current().map(|t| t.id) {
                        finish(&mut q, id);
                    }
                }
                Op::Restart => q.start(tracks.clone()),
            }

            match q.position() {
                Some(p) => {
                    prop_assert!(p < len);
                    prop_assert!(q.state() != PlaybackState::Stopped);
                }
                None => {
                    prop_assert_eq!(len, 0);
                    prop_assert_eq!(q.state(), PlaybackState::Stopped);
                }
            }

            // Moving forward from the last track never wraps to the start.
            if matches!(op, Op::Advance | Op::FinishCurrent) && before == len.checked_sub(1) {
                prop_assert_eq!(q.position(), before);
            }
        }
    }
}
