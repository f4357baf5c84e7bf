//! Persistent caching of built collections.
//!
//! Provides the [`CollectionCache`] trait and two implementations:
//! - [`FileCollectionCache`]: JSON file in a cache directory
//! - [`NullCollectionCache`]: no-op cache (always misses)
//!
//! A cached collection carries the [`FileResource`](crate::FileResource)s it
//! was built from; the caller decides whether it is still fresh.

use std::fs;
use std::path::PathBuf;

use crate::collection::WebspaceCollection;

/// Cache file name inside the cache directory.
const CACHE_FILENAME: &str = "webspaces.json";

/// Storage for a built [`WebspaceCollection`].
pub trait CollectionCache: Send + Sync {
    /// Retrieve the cached collection.
    ///
    /// Returns `None` on cache miss or unreadable cache.
    fn get(&self) -> Option<WebspaceCollection>;

    /// Store a collection, replacing any previous one.
    fn set(&self, collection: &WebspaceCollection);

    /// Remove the cached collection.
    fn invalidate(&self);
}

/// Cache that never stores anything.
#[derive(Debug)]
pub struct NullCollectionCache;

impl CollectionCache for NullCollectionCache {
    fn get(&self) -> Option<WebspaceCollection> {
        None
    }

    fn set(&self, _collection: &WebspaceCollection) {}

    fn invalidate(&self) {}
}

/// File-based collection cache.
///
/// Stores the collection as JSON in `{cache_dir}/webspaces.json`. The file
/// is written next to its destination and renamed into place, so readers see
/// either the old or the new collection.
#[derive(Debug)]
pub struct FileCollectionCache {
    cache_dir: PathBuf,
}

impl FileCollectionCache {
    /// Create a cache storing its file in `cache_dir`.
    #[must_use]
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILENAME)
    }
}

impl CollectionCache for FileCollectionCache {
    fn get(&self) -> Option<WebspaceCollection> {
        let content = fs::read_to_string(self.cache_path()).ok()?;
        match serde_json::from_str(&content) {
            Ok(collection) => Some(collection),
            Err(e) => {
                tracing::debug!(error = %e, "Failed to parse webspace cache");
                None
            }
        }
    }

    fn set(&self, collection: &WebspaceCollection) {
        if let Err(e) = fs::create_dir_all(&self.cache_dir) {
            tracing::debug!(error = %e, "Failed to create cache directory");
            return;
        }

        let content = match serde_json::to_string(collection) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to serialize webspace collection");
                return;
            }
        };

        let path = self.cache_path();
        let tmp_path = path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp_path, content) {
            tracing::debug!(error = %e, "Failed to write webspace cache");
            return;
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            tracing::debug!(error = %e, "Failed to publish webspace cache");
            let _ = fs::remove_file(&tmp_path);
        }
    }

    fn invalidate(&self) {
        let path = self.cache_path();
        if path.exists()
            && let Err(e) = fs::remove_file(&path)
        {
            tracing::debug!(error = %e, "Failed to remove webspace cache");
        }
    }
}
