//! Shared application state: the store behind one lock, plus its persistence
//! hook.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::blog::Blog;
use crate::error::StoreError;
use crate::persist::Persistence;
use crate::store::BlogStore;

/// State shared by every route.
///
/// All store access, reads included, goes through one mutex so id assignment
/// and the update merge never interleave. Saves run while the lock is held,
/// keeping the file in step with memory.
pub struct App {
    store: Mutex<BlogStore>,
    persistence: Option<Box<dyn Persistence>>,
}

impl App {
    /// An app over `store` that never writes anywhere.
    pub fn in_memory(store: BlogStore) -> Self {
        Self { store: Mutex::new(store), persistence: None }
    }

    /// An app over `store` that saves through `persistence` after each
    /// mutation.
    pub fn persisted(store: BlogStore, persistence: impl Persistence + 'static) -> Self {
        Self { store: Mutex::new(store), persistence: Some(Box::new(persistence)) }
    }

    /// Loads the saved records and starts persisting to the same place.
    ///
    /// A load failure is logged and the app starts with an empty store.
    pub fn load(persistence: impl Persistence + 'static) -> Self {
        let store = match persistence.load() {
            Ok(blogs) => {
                info!(count = blogs.len(), "blogs loaded");
                BlogStore::from_blogs(blogs)
            }
            Err(e) => {
                warn!("could not load saved blogs, starting empty: {e}");
                BlogStore::new()
            }
        };
        Self::persisted(store, persistence)
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    /// Runs a read-only store operation under the lock and returns whatever it
    /// produces. Anything borrowed from the store must be copied out by `op`.
    pub async fn read<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&BlogStore) -> Result<T, StoreError>,
    {
        let store = self.store.lock().await;
        op(&store)
    }

    /// Runs a mutating store operation and, if it succeeds, saves the store
    /// before returning.
    ///
    /// A failed save exits the process: carrying on would leave memory and
    /// disk disagreeing about what exists.
    pub async fn write<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut BlogStore) -> Result<T, StoreError>,
    {
        let mut store = self.store.lock().await;
        let out = op(&mut store)?;
        if let Some(persistence) = &self.persistence {
            save_or_exit(persistence.as_ref(), store.blogs());
        }
        Ok(out)
    }
}

fn save_or_exit(persistence: &dyn Persistence, blogs: &[Blog]) {
    if let Err(e) = persistence.save(blogs) {
        error!("saving blogs failed, shutting down: {e}");
        // `exit` runs no destructors.
        persistence.discard();
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::blog::BlogData;
    use crate::persist::{JsonFile, read_blogs};

    #[tokio::test]
    async fn successful_writes_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blogs.json");
        let app = App::load(JsonFile::new(&path));

        let id = app
            .write(|s| s.create(BlogData::new("T", "B", "A", ["x"])).map(|b| b.id))
            .await
            .unwrap();

        assert_eq!(id, 1);
        assert_eq!(read_blogs(&path).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_writes_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blogs.json");
        let app = App::load(JsonFile::new(&path));

        let err = app.write(|s| s.delete(1)).await.unwrap_err();

        assert_eq!(err, StoreError::NotFound(1));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unreadable_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blogs.json");
        fs::write(&path, "[{").unwrap();

        let app = App::load(JsonFile::new(&path));

        assert_eq!(app.len().await, 0);
    }

    #[tokio::test]
    async fn reads_see_loaded_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blogs.json");
        let mut seed = BlogStore::new();
        seed.create(BlogData::new("T", "B", "A", ["x"])).unwrap();
        JsonFile::new(&path).save(seed.blogs()).unwrap();

        let app = App::load(JsonFile::new(&path));
        let title = app.read(|s| s.get(1).map(|b| b.title.clone())).await.unwrap();

        assert_eq!(title, "T");
    }
}
