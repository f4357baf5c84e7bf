//! Abstraction over where webspace configuration comes from.

use crate::error::SourceError;
use crate::webspace::{FileResource, LoadedWebspace};

/// Provider of parsed webspace configurations.
///
/// Parsing the configuration format is the source's job; the builder only
/// sees [`LoadedWebspace`] values.
pub trait WebspaceSource: Send + Sync {
    /// Load all webspaces, ordered by the name of their configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if a file cannot be read, parsed or is invalid.
    fn load(&self) -> Result<Vec<LoadedWebspace>, SourceError>;

    /// Current identity of every configuration file, in [`load`](Self::load) order.
    ///
    /// A collection built earlier is still fresh when this equals its
    /// [`resources`](crate::WebspaceCollection::resources).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the files cannot be inspected.
    fn resources(&self) -> Result<Vec<FileResource>, SourceError>;
}
