//! Application model: the library plus what the UI has selected.
//!
//! The album list and the selected album's track list are two panes; `focus`
//! decides which one `next`/`prev` move in.

use crate::audio::PlaybackHandle;
use crate::library::{Album, AlbumId, Library, Track};
use crate::queue::QueueSnapshot;

/// Which list keyboard navigation applies to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Albums,
    Tracks,
}

/// The main application model.
#[derive(Default)]
pub struct App {
    pub library: Library,
    pub focus: Focus,
    pub now_playing: QueueSnapshot,
    pub playback_handle: Option<PlaybackHandle>,

    selected_album: usize,
    selected_track: usize,
}

impl App {
    pub fn new(library: Library) -> Self {
        Self {
            library,
            ..Self::default()
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn set_now_playing(&mut self, snapshot: QueueSnapshot) {
        self.now_playing = snapshot;
    }

    pub fn has_albums(&self) -> bool {
        !self.library.is_empty()
    }

    pub fn selected_album_index(&self) -> usize {
        self.selected_album
    }

    pub fn selected_track_index(&self) -> usize {
        self.selected_track
    }

    pub fn selected_album(&self) -> Option<&Album> {
        self.library.albums().get(self.selected_album)
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected_album()
            .and_then(|a| a.tracks.get(self.selected_track))
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Albums => Focus::Tracks,
            Focus::Tracks => Focus::Albums,
        };
    }

    /// Move selection down in the focused pane. Wraps around.
    pub fn next(&mut self) {
        match self.focus {
            Focus::Albums => {
                let len = self.library.albums().len();
                if len > 0 {
                    self.selected_album = (self.selected_album + 1) % len;
                    self.selected_track = 0;
                }
            }
            Focus::Tracks => {
                let len = self.selected_album().map_or(0, |a| a.tracks.len());
                if len > 0 {
                    self.selected_track = (self.selected_track + 1) % len;
                }
            }
        }
    }

    /// Move selection up in the focused pane. Wraps around.
    pub fn prev(&mut self) {
        match self.focus {
            Focus::Albums => {
                let len = self.library.albums().len();
                if len > 0 {
                    self.selected_album = (self.selected_album + len - 1) % len;
                    self.selected_track = 0;
                }
            }
            Focus::Tracks => {
                let len = self.selected_album().map_or(0, |a| a.tracks.len());
                if len > 0 {
                    self.selected_track = (self.selected_track + len - 1) % len;
                }
            }
        }
    }

    /// Add `tracks` to the library, keeping the selected album selected.
    pub fn import_tracks(&mut self, tracks: Vec<Track>) -> usize {
        let keep = self.selected_album().map(|a| a.id);
        let added = self.library.import_tracks(tracks);
        if let Some(id) = keep {
            self.reselect_album(id);
        }
        self.clamp_selection();
        added
    }

    /// Remove the selected track from the library. Only acts when the track
    /// pane has focus.
    pub fn remove_selected_track(&mut self) -> Option<Track> {
        if self.focus != Focus::Tracks {
            return None;
        }
        let album_id = self.selected_album()?.id;
        let track_id = self.selected_track()?.id;
        let removed = self.library.remove_track(track_id)?;

        if self.library.album(album_id).is_some() {
            self.reselect_album(album_id);
        } else {
            // The album went away with its last track.
            self.selected_track = 0;
            self.focus = Focus::Albums;
        }
        self.clamp_selection();
        Some(removed)
    }

    fn reselect_album(&mut self, id: AlbumId) {
        if let Some(idx) = self.library.albums().iter().position(|a| a.id == id) {
            self.selected_album = idx;
        }
    }

    fn clamp_selection(&mut self) {
        let albums = self.library.albums().len();
        if albums == 0 {
            self.selected_album = 0;
            self.selected_track = 0;
            self.focus = Focus::Albums;
            return;
        }
        self.selected_album = self.selected_album.min(albums - 1);

        let tracks = self.selected_album().map_or(0, |a| a.tracks.len());
        self.selected_track = self.selected_track.min(tracks.saturating_sub(1));
    }
}
