use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config;
use crate::library::{Importer, Track};
use crate::store::{AnyStore, FileStore, MemoryStore};

/// Sources named on the command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StartupArgs {
    /// Files or folders to import now.
    pub import: Vec<PathBuf>,
    /// Remembered sources to drop before restoring.
    pub forget: Vec<PathBuf>,
}

impl StartupArgs {
    /// `cdcase [PATH]... [--forget PATH]...`
    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut out = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--forget" {
                match args.next() {
                    Some(p) => out.forget.push(PathBuf::from(p)),
                    None => eprintln!("cdcase: --forget needs a path"),
                }
            } else {
                out.import.push(PathBuf::from(arg));
            }
        }
        out
    }
}

/// Remembered sources live in a file when one can be opened, otherwise only
/// for this session.
pub fn open_store(settings: &config::Settings) -> AnyStore {
    let Some(path) = settings.store_path() else {
        warn!("no store location; sources will not be remembered");
        return AnyStore::Memory(MemoryStore::new());
    };
    match FileStore::open(&path) {
        Ok(store) => {
            debug!(path = %store.path().display(), "using source store");
            AnyStore::File(store)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to open store; sources will not be remembered");
            AnyStore::Memory(MemoryStore::new())
        }
    }
}

/// Tracks from remembered sources plus the ones on the command line.
pub fn load_tracks(settings: &config::Settings, args: &StartupArgs) -> Vec<Track> {
    let mut importer = Importer::new(open_store(settings), settings.library.clone());
    for source in &args.forget {
        importer.forget(source);
    }

    let mut tracks = importer.restore();
    tracks.extend(importer.import(&args.import));

    info!(
        sources = importer.sources().len(),
        files = tracks.len(),
        "sources read"
    );
    tracks
}
