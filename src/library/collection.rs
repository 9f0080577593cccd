use std::collections::HashSet;

use tracing::debug;

use super::model::{Album, AlbumId, Track, TrackId};
use super::organize::organize;

/// The imported track set and the albums derived from it.
#[derive(Debug, Default, Clone)]
pub struct Library {
    tracks: Vec<Track>,
    albums: Vec<Album>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `tracks` whose file is not in the library yet and regroup.
    ///
    /// Returns how many tracks were added.
    pub fn import_tracks(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        let mut known: HashSet<_> = self.tracks.iter().map(|t| t.path.clone()).collect();
        let before = self.tracks.len();

        for track in tracks {
            if known.insert(track.path.clone()) {
                self.tracks.push(track);
            } else {
                debug!(path = %track.path.display(), "skipping track already in library");
            }
        }

        let added = self.tracks.len() - before;
        self.rebuild_albums();
        added
    }

    /// Remove the track with `id` and regroup.
    pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
        let pos = self.tracks.iter().position(|t| t.id == id)?;
        let removed = self.tracks.remove(pos);
        self.rebuild_albums();
        Some(removed)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn rebuild_albums(&mut self) {
        self.albums = organize(&self.tracks);
    }
}
