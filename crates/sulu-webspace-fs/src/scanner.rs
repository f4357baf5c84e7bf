//! Discovery of webspace configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use sulu_webspace::SourceError;

/// Extension of webspace configuration files.
const EXTENSION: &str = "toml";

/// List the webspace files directly inside `dir`, sorted by file name.
///
/// Hidden files and subdirectories are skipped. A missing directory yields
/// an empty list.
pub(crate) fn scan(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "Webspace directory does not exist");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(SourceError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .map(|e| e.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
