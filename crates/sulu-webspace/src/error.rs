//! Error types for building and loading webspaces.

use std::path::PathBuf;

/// Configuration error that aborts a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Default template is not among the available templates.
    #[error("Default template \"{template}\" of webspace \"{webspace}\" is not available")]
    UnknownTemplate {
        /// Webspace key.
        webspace: String,
        /// Template name.
        template: String,
    },
    /// Default template is excluded by the same webspace.
    #[error("Default template \"{template}\" of webspace \"{webspace}\" is excluded")]
    ExcludedTemplate {
        /// Webspace key.
        webspace: String,
        /// Template name.
        template: String,
    },
}

/// Error raised by a [`WebspaceSource`](crate::WebspaceSource).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Reading a configuration file or directory failed.
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        /// Affected path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A configuration file could not be parsed.
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse {
        /// Affected file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// A configuration file parsed but is not usable.
    #[error("Invalid webspace configuration in {}: {message}", .path.display())]
    Invalid {
        /// Affected file.
        path: PathBuf,
        /// What is wrong.
        message: String,
    },
}

/// Error raised while reloading a [`WebspaceManager`](crate::WebspaceManager).
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// Loading configuration failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Building the collection failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}
