use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

/// Placeholder artist used when a file carries no artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Placeholder album used when a file carries no album tag.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Opaque identity of an imported track.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Identity of a derived album.
///
/// Computed from the `(album, artist)` grouping key, so regrouping the same
/// tracks yields the same id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AlbumId(Uuid);

impl AlbumId {
    pub fn from_key(album: &str, artist: &str) -> Self {
        let mut name = Vec::with_capacity(album.len() + artist.len() + 1);
        name.extend_from_slice(album.as_bytes());
        name.push(0);
        name.extend_from_slice(artist.as_bytes());
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, &name))
    }
}

/// Raw cover art bytes as found in the file's tags.
pub type Artwork = Arc<[u8]>;

/// A single imported audio file. Never mutated after import.
#[derive(Clone, Debug)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub track_number: Option<u32>,
    pub artwork: Option<Artwork>,
    pub path: PathBuf,
    pub duration: Option<Duration>,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

/// Tracks sharing an `(album, artist)` pair, in play order.
#[derive(Clone, Debug)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist: String,
    pub artwork: Option<Artwork>,
    pub tracks: Vec<Track>,
}
