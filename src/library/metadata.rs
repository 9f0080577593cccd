//! Tag extraction for a single audio file.

use std::path::Path;
use std::time::Duration;

use lofty::picture::{Picture, PictureType};
use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::debug;

use super::model::{Artwork, Track, TrackId, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

/// Whatever the file's tags provided. Every field is optional.
#[derive(Debug, Default, Clone)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track_number: Option<u32>,
    pub artwork: Option<Vec<u8>>,
    pub duration: Option<Duration>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn pick_artwork(pictures: &[Picture]) -> Option<&Picture> {
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
}

/// Read tags from `path`. Unreadable files yield empty metadata.
pub fn read_metadata(path: &Path) -> TrackMetadata {
    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tags");
            return TrackMetadata::default();
        }
    };

    let mut meta = TrackMetadata {
        duration: Some(tagged.properties().duration()),
        ..TrackMetadata::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        meta.title = non_empty(tag.title().as_deref());
        meta.artist = non_empty(tag.artist().as_deref());
        meta.album = non_empty(tag.album().as_deref());
        meta.track_number = tag.track();
        meta.artwork = pick_artwork(tag.pictures()).map(|p| p.data().to_vec());
    }

    meta
}

/// Build a `Track` from extracted metadata, filling gaps with placeholders.
///
/// The title falls back to the file stem.
pub fn track_from_metadata(path: &Path, meta: TrackMetadata) -> Track {
    let title = meta.title.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string()
    });

    Track {
        id: TrackId::new(),
        title,
        artist: meta.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        album: meta.album.unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
        track_number: meta.track_number,
        artwork: meta.artwork.map(Artwork::from),
        path: path.to_path_buf(),
        duration: meta.duration,
    }
}

pub fn read_track(path: &Path) -> Track {
    track_from_metadata(path, read_metadata(path))
}
