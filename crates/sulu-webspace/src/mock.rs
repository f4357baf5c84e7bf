//! In-memory webspace source for testing.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::error::SourceError;
use crate::source::WebspaceSource;
use crate::webspace::{FileResource, LoadedWebspace, Webspace};

/// Webspace source backed by a list of webspaces.
///
/// Each webspace gets a fake resource `{key}.toml` whose fingerprint is its
/// revision, bumped by [`MockSource::replace`].
///
/// # Example
///
/// ```ignore
/// use sulu_webspace::{MockSource, WebspaceSource};
///
/// let source = MockSource::new().with_webspace(webspace);
/// let loaded = source.load().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    webspaces: RwLock<Vec<(Webspace, u64)>>,
    loads: AtomicUsize,
}

impl MockSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a webspace.
    #[must_use]
    pub fn with_webspace(self, webspace: Webspace) -> Self {
        self.webspaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((webspace, 0));
        self
    }

    /// Replace the webspace with the same key and bump its revision.
    pub fn replace(&self, webspace: Webspace) {
        let mut webspaces = self
            .webspaces
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match webspaces.iter_mut().find(|(w, _)| w.key == webspace.key) {
            Some(entry) => *entry = (webspace, entry.1 + 1),
            None => webspaces.push((webspace, 0)),
        }
    }

    /// Number of [`load`](WebspaceSource::load) calls so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn resource(webspace: &Webspace, revision: u64) -> FileResource {
        FileResource {
            path: PathBuf::from(format!("{}.toml", webspace.key)),
            fingerprint: revision.to_string(),
        }
    }
}

impl WebspaceSource for MockSource {
    fn load(&self) -> Result<Vec<LoadedWebspace>, SourceError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        let webspaces = self.webspaces.read().unwrap_or_else(PoisonError::into_inner);
        Ok(webspaces
            .iter()
            .map(|(webspace, revision)| LoadedWebspace {
                webspace: webspace.clone(),
                resource: Self::resource(webspace, *revision),
            })
            .collect())
    }

    fn resources(&self) -> Result<Vec<FileResource>, SourceError> {
        let webspaces = self.webspaces.read().unwrap_or_else(PoisonError::into_inner);
        Ok(webspaces
            .iter()
            .map(|(webspace, revision)| Self::resource(webspace, *revision))
            .collect())
    }
}
