//! Load/save hooks for the store's on-disk copy.
//!
//! The store itself never touches the filesystem. [`App`](crate::App) loads
//! once at startup and saves the whole collection after every successful
//! mutation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::blog::Blog;
use crate::error::PersistenceError;

/// Where the store is written between runs.
pub trait Persistence: Send + Sync {
    /// Reads previously saved records. A store that has never been saved
    /// loads as empty.
    fn load(&self) -> Result<Vec<Blog>, PersistenceError>;

    /// Replaces the saved copy with `blogs`.
    fn save(&self, blogs: &[Blog]) -> Result<(), PersistenceError>;

    /// Removes anything that should not outlive the process. Called before an
    /// exit that skips destructors.
    fn discard(&self) {}
}

/// A single JSON file holding the full array of records.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFile {
    fn load(&self) -> Result<Vec<Blog>, PersistenceError> {
        match read_blogs(&self.path) {
            Err(PersistenceError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no saved blogs, starting empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn save(&self, blogs: &[Blog]) -> Result<(), PersistenceError> {
        // Write beside the target and rename so a crash never leaves half a file.
        let staging = self.path.with_extension("json.tmp");
        write_blogs(&staging, blogs)?;
        fs::rename(&staging, &self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = blogs.len(), "blogs saved");
        Ok(())
    }
}

/// A throwaway file, deleted when this value is dropped.
///
/// Nothing is ever loaded from it; each run starts from whatever the
/// application seeds.
#[derive(Debug)]
pub struct TempFile {
    file: NamedTempFile,
}

impl TempFile {
    pub fn new() -> Result<Self, PersistenceError> {
        let file = tempfile::Builder::new()
            .prefix("blogs-")
            .suffix(".json")
            .tempfile()
            .map_err(|source| PersistenceError::Io { path: std::env::temp_dir(), source })?;
        info!(path = %file.path().display(), "saving blogs to temporary file");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Persistence for TempFile {
    fn load(&self) -> Result<Vec<Blog>, PersistenceError> {
        Ok(Vec::new())
    }

    fn save(&self, blogs: &[Blog]) -> Result<(), PersistenceError> {
        write_blogs(self.file.path(), blogs)
    }

    fn discard(&self) {
        if let Err(e) = fs::remove_file(self.file.path()) {
            warn!(path = %self.file.path().display(), "cannot remove temporary blogs file: {e}");
        }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        debug!(path = %self.file.path().display(), "discarding temporary blogs file");
    }
}

/// Reads a JSON array of records. An empty file counts as no records.
pub fn read_blogs(path: &Path) -> Result<Vec<Blog>, PersistenceError> {
    let raw = fs::read(path).map_err(|source| PersistenceError::Io {
        path: path.to_owned(),
        source,
    })?;
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(&raw)?)
}

fn write_blogs(path: &Path, blogs: &[Blog]) -> Result<(), PersistenceError> {
    let payload = crate::response::to_pretty_json(blogs)?;
    fs::write(path, payload).map_err(|source| PersistenceError::Io {
        path: path.to_owned(),
        source,
    })
}
