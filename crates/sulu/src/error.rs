//! CLI error types.

use sulu_config::ConfigError;
use sulu_webspace::{BuildError, ManagerError, SourceError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Manager(#[from] ManagerError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
