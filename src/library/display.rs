use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a display string for `track` from the configured `fields`, joined by `sep`.
///
/// Falls back to the title when no field produced any text.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Title => {
                if !track.title.trim().is_empty() {
                    parts.push(track.title.trim().to_string());
                }
            }
            TrackDisplayField::Artist => {
                if !track.artist.trim().is_empty() {
                    parts.push(track.artist.trim().to_string());
                }
            }
            TrackDisplayField::Album => {
                if !track.album.trim().is_empty() {
                    parts.push(track.album.trim().to_string());
                }
            }
            TrackDisplayField::TrackNumber => {
                if let Some(n) = track.track_number {
                    parts.push(format!("#{n}"));
                }
            }
            TrackDisplayField::Filename => {
                if let Some(stem) = track.path.file_stem().and_then(|s| s.to_str()) {
                    if !stem.trim().is_empty() {
                        parts.push(stem.to_string());
                    }
                }
            }
            TrackDisplayField::Path => {
                parts.push(track.path.display().to_string());
            }
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
