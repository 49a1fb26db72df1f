//! Freshness-keyed memoization of loaded tables. The loader is injected so the core can
//! be exercised without a filesystem; [CsvDir] is the production loader, keyed by file
//! modification time.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::record::{PlayFrame, TableError};

pub trait FrameLoader {
    /// Freshness token for a key; a change in token invalidates the cached snapshot.
    type Token: PartialEq;

    fn freshness(&self, key: &str) -> Result<Self::Token, TableError>;

    fn load(&self, key: &str) -> Result<PlayFrame, TableError>;
}

pub struct FrameCache<L: FrameLoader> {
    loader: L,
    entries: FxHashMap<String, (L::Token, Arc<PlayFrame>)>,
}
impl<L: FrameLoader> FrameCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: FxHashMap::default(),
        }
    }

    /// Returns the cached snapshot for `key`, reloading only when the freshness token has
    /// changed since the last load.
    pub fn get_or_load(&mut self, key: &str) -> Result<Arc<PlayFrame>, TableError> {
        let token = self.loader.freshness(key)?;
        if let Some((held, frame)) = self.entries.get(key) {
            if *held == token {
                debug!("table \"{key}\" served from cache");
                return Ok(Arc::clone(frame));
            }
        }
        debug!("loading table \"{key}\"");
        let frame = Arc::new(self.loader.load(key)?);
        self.entries.insert(key.to_string(), (token, Arc::clone(&frame)));
        Ok(frame)
    }
}

/// Loads `<root>/<key>.csv`, using the file's modification time as the freshness token.
pub struct CsvDir {
    root: PathBuf,
}
impl CsvDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.csv"))
    }
}
impl FrameLoader for CsvDir {
    type Token = SystemTime;

    fn freshness(&self, key: &str) -> Result<SystemTime, TableError> {
        Ok(fs::metadata(self.path_for(key))?.modified()?)
    }

    fn load(&self, key: &str) -> Result<PlayFrame, TableError> {
        PlayFrame::read_csv_file(self.path_for(key))
    }
}
