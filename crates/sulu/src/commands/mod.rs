//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod dump;

pub(crate) use check::CheckArgs;
pub(crate) use dump::DumpArgs;

use std::path::Path;
use std::sync::Arc;

use sulu_config::Config;
use sulu_webspace::{WebspaceCollectionBuilder, WebspaceManager, WebspaceSource};
use sulu_webspace_fs::FsWebspaceSource;

use crate::error::CliError;

/// Builder validating against the configured templates.
pub(crate) fn collection_builder(config: &Config) -> WebspaceCollectionBuilder {
    WebspaceCollectionBuilder::new(config.templates.available.iter().cloned())
}

/// Filesystem source for the configured webspace directory.
pub(crate) fn webspace_source(config: &Config) -> FsWebspaceSource {
    FsWebspaceSource::new(config.webspaces_resolved.dir.clone())
}

/// Manager for the configured webspaces, with file cache when enabled.
pub(crate) fn webspace_manager(config: &Config) -> Result<WebspaceManager, CliError> {
    let source: Arc<dyn WebspaceSource> = Arc::new(webspace_source(config));
    let cache_dir = if config.webspaces_resolved.cache_enabled {
        ensure_project_dir(&config.webspaces_resolved.project_dir)?;
        Some(config.webspaces_resolved.cache_dir())
    } else {
        None
    };
    Ok(WebspaceManager::new(
        source,
        collection_builder(config),
        cache_dir,
    ))
}

/// Ensure the `.sulu/` project directory exists with a `.gitignore`.
fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir)?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by sulu\n*\n");
    }

    Ok(())
}
