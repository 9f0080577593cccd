//! Album grouping and ordering.
//!
//! Albums are never stored: they are rebuilt from the full track set every
//! time it changes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::model::{Album, AlbumId, Track};

/// Order two tracks of the same album.
///
/// Numbered tracks come first, by number. Unnumbered tracks and equal numbers
/// fall back to the title (ordinal comparison).
pub fn compare_tracks(a: &Track, b: &Track) -> Ordering {
    match (a.track_number, b.track_number) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.title.cmp(&b.title)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.title.cmp(&b.title),
    }
}

/// Order albums by artist, then title.
pub fn compare_albums(a: &Album, b: &Album) -> Ordering {
    a.artist
        .cmp(&b.artist)
        .then_with(|| a.title.cmp(&b.title))
}

/// Group `tracks` by exact `(album, artist)` and return the sorted albums.
///
/// Album-level title, artist and artwork are taken from the first track after
/// sorting.
pub fn organize(tracks: &[Track]) -> Vec<Album> {
    let mut groups: BTreeMap<(&str, &str), Vec<Track>> = BTreeMap::new();
    for track in tracks {
        groups
            .entry((track.album.as_str(), track.artist.as_str()))
            .or_default()
            .push(track.clone());
    }

    let mut albums: Vec<Album> = groups
        .into_iter()
        .filter_map(|((album, artist), mut members)| {
            members.sort_by(compare_tracks);
            let first = members.first()?;
            Some(Album {
                id: AlbumId::from_key(album, artist),
                title: first.album.clone(),
                artist: first.artist.clone(),
                artwork: first.artwork.clone(),
                tracks: members,
            })
        })
        .collect();

    albums.sort_by(compare_albums);
    albums
}
