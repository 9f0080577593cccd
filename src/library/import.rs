use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::store::KeyValueStore;

use super::metadata::read_track;
use super::model::Track;

const SOURCE_PREFIX: &str = "source:";

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn walk_dir(dir: &Path, settings: &LibrarySettings, out: &mut Vec<PathBuf>) {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() && is_audio_file(path, settings) {
            out.push(path.to_path_buf());
        }
    }
}

/// Expand file and folder references into individual audio files.
///
/// Missing paths and non-audio files are dropped. The result is sorted and
/// free of duplicates.
pub fn expand_sources(sources: &[PathBuf], settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for source in sources {
        if source.is_dir() {
            walk_dir(source, settings, &mut files);
        } else if source.is_file() {
            if is_audio_file(source, settings) {
                files.push(source.clone());
            } else {
                debug!(path = %source.display(), "not an audio file");
            }
        } else {
            debug!(path = %source.display(), "source does not exist");
        }
    }
    files.sort();
    files.dedup();
    files
}

/// Store key for a source. Keys are strings, so paths that are not valid
/// UTF-8 have none.
fn source_key(path: &Path) -> Option<String> {
    path.to_str().map(|p| format!("{SOURCE_PREFIX}{p}"))
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Turns granted files and folders into tracks, remembering each source in
/// the injected store.
pub struct Importer<S: KeyValueStore> {
    store: S,
    settings: LibrarySettings,
}

impl<S: KeyValueStore> Importer<S> {
    pub fn new(store: S, settings: LibrarySettings) -> Self {
        Self { store, settings }
    }

    /// Import `sources`, remembering the ones that exist.
    pub fn import(&mut self, sources: &[PathBuf]) -> Vec<Track> {
        let mut granted = Vec::new();
        for source in sources {
            let kind = if source.is_dir() {
                "dir"
            } else if source.is_file() {
                "file"
            } else {
                warn!(path = %source.display(), "skipping missing source");
                continue;
            };
            let source = absolute(source);
            match source_key(&source) {
                Some(key) if self.store.get(&key).as_deref() != Some(kind) => {
                    info!(path = %source.display(), kind, "remembering source");
                    if let Err(e) = self.store.set(&key, kind) {
                        warn!(path = %source.display(), error = %e, "failed to remember source");
                    }
                }
                Some(_) => {}
                None => {
                    warn!(path = %source.display(), "source path is not valid UTF-8; importing it for this session only");
                }
            }
            granted.push(source);
        }
        self.read_all(&granted)
    }

    /// Re-import every remembered source. Sources that disappeared are
    /// forgotten.
    pub fn restore(&mut self) -> Vec<Track> {
        let mut sources = Vec::new();
        for key in self.store.keys() {
            let Some(raw) = key.strip_prefix(SOURCE_PREFIX) else {
                continue;
            };
            let path = PathBuf::from(raw);
            if path.exists() {
                sources.push(path);
            } else {
                info!(path = %path.display(), "forgetting source that no longer exists");
                self.forget(&path);
            }
        }
        self.read_all(&sources)
    }

    pub fn forget(&mut self, source: &Path) {
        // A path without a key was never remembered.
        let Some(key) = source_key(&absolute(source)) else {
            return;
        };
        if let Err(e) = self.store.remove(&key) {
            warn!(path = %source.display(), error = %e, "failed to forget source");
        }
    }

    /// Remembered sources, for display and tests.
    pub fn sources(&self) -> Vec<PathBuf> {
        self.store
            .keys()
            .iter()
            .filter_map(|k| k.strip_prefix(SOURCE_PREFIX).map(PathBuf::from))
            .collect()
    }

    fn read_all(&self, sources: &[PathBuf]) -> Vec<Track> {
        let files = expand_sources(sources, &self.settings);
        debug!(files = files.len(), "reading tags");
        files.iter().map(|p| read_track(p)).collect()
    }
}
