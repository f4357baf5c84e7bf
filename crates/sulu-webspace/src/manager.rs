//! Shared access to the current webspace collection.
//!
//! [`WebspaceManager`] builds a [`WebspaceCollection`] from a
//! [`WebspaceSource`] and hands out `Arc` snapshots of it.
//!
//! # Thread Safety
//!
//! - `get()` clones the current `Arc` under a short read lock
//! - `reload_if_needed()` uses double-checked locking so only one thread rebuilds
//! - a new collection is published by swapping the `Arc` in one step, readers
//!   never see a partially built collection
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sulu_webspace::{WebspaceCollectionBuilder, WebspaceManager};
//!
//! let manager = WebspaceManager::new(source, WebspaceCollectionBuilder::new(["default"]), None);
//! let collection = manager.reload_if_needed()?;
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use crate::builder::WebspaceCollectionBuilder;
use crate::cache::{CollectionCache, FileCollectionCache, NullCollectionCache};
use crate::collection::WebspaceCollection;
use crate::error::ManagerError;
use crate::source::WebspaceSource;

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Owns the current [`WebspaceCollection`] snapshot.
pub struct WebspaceManager {
    source: Arc<dyn WebspaceSource>,
    builder: WebspaceCollectionBuilder,
    cache: Box<dyn CollectionCache>,
    /// Serializes rebuilds.
    reload_lock: Mutex<()>,
    /// Current snapshot.
    current: RwLock<Arc<WebspaceCollection>>,
    /// Whether `current` reflects the source.
    valid: AtomicBool,
}

impl WebspaceManager {
    /// Create a manager. `cache_dir` of `None` disables the file cache.
    #[must_use]
    pub fn new(
        source: Arc<dyn WebspaceSource>,
        builder: WebspaceCollectionBuilder,
        cache_dir: Option<PathBuf>,
    ) -> Self {
        let cache: Box<dyn CollectionCache> = match cache_dir {
            Some(dir) => Box::new(FileCollectionCache::new(dir)),
            None => Box::new(NullCollectionCache),
        };
        Self::with_cache(source, builder, cache)
    }

    /// Create a manager with a custom cache.
    #[must_use]
    pub fn with_cache(
        source: Arc<dyn WebspaceSource>,
        builder: WebspaceCollectionBuilder,
        cache: Box<dyn CollectionCache>,
    ) -> Self {
        Self {
            source,
            builder,
            cache,
            reload_lock: Mutex::new(()),
            current: RwLock::new(Arc::new(WebspaceCollection::default())),
            valid: AtomicBool::new(false),
        }
    }

    /// Current snapshot, without checking whether it is up to date.
    ///
    /// Empty until the first successful [`reload_if_needed`](Self::reload_if_needed).
    #[must_use]
    pub fn get(&self) -> Arc<WebspaceCollection> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rebuild the collection if it was invalidated or never built.
    ///
    /// A cached collection is reused when the source's resources and the
    /// builder's available templates still match the ones it was built from.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if loading or building fails. The previous
    /// snapshot stays current in that case.
    pub fn reload_if_needed(&self) -> Result<Arc<WebspaceCollection>, ManagerError> {
        let start = Instant::now();

        if self.valid.load(Ordering::Acquire) {
            return Ok(self.get());
        }

        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.valid.load(Ordering::Acquire) {
            return Ok(self.get());
        }

        if let Some(cached) = self.cache.get() {
            if cached.available_templates() == self.builder.available_templates().as_slice()
                && cached.resources() == self.source.resources()?.as_slice()
            {
                let collection = self.publish(cached);
                tracing::info!(
                    source = "file_cache",
                    elapsed_ms = elapsed_ms(start),
                    "Webspaces reloaded"
                );
                return Ok(collection);
            }
            tracing::debug!("Webspace cache is stale");
        }

        let loaded = self.source.load()?;
        let collection = self.builder.build(loaded)?;
        self.cache.set(&collection);
        let collection = self.publish(collection);

        tracing::info!(
            source = "config",
            webspace_count = collection.webspaces().len(),
            elapsed_ms = elapsed_ms(start),
            "Webspaces reloaded"
        );

        Ok(collection)
    }

    /// Mark the snapshot stale and drop the file cache.
    ///
    /// Readers keep using the `Arc` they already hold.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
        self.cache.invalidate();
    }

    fn publish(&self, collection: WebspaceCollection) -> Arc<WebspaceCollection> {
        let collection = Arc::new(collection);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&collection);
        self.valid.store(true, Ordering::Release);
        collection
    }
}
