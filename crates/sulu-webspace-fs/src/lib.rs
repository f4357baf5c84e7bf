//! Filesystem webspace source.
//!
//! Reads one webspace per `*.toml` file from a directory. Files are processed
//! in file name order, and each one is fingerprinted with the SHA-256 of its
//! content so a cached collection can tell when it is stale.
//!
//! # File Format
//!
//! ```toml
//! key = "acme"
//! name = "ACME"
//! excluded_templates = ["legacy"]
//!
//! [default_templates]
//! page = "default"
//! home = "homepage"
//!
//! [[portals]]
//! key = "acme"
//! name = "ACME"
//! localizations = [
//!     { language = "en", country = "us", default = true },
//!     { language = "de" },
//! ]
//!
//! [[portals.environments]]
//! type = "prod"
//! urls = [
//!     { url = "{language}.acme.com", main = true },
//!     { url = "www.acme.com", redirect = "en.acme.com" },
//! ]
//! custom_urls = [{ url = "*.acme.com/campaign" }]
//! ```

mod scanner;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use sulu_webspace::{FileResource, LoadedWebspace, SourceError, Webspace, WebspaceSource};

/// Webspace source reading TOML files from a directory.
#[derive(Debug, Clone)]
pub struct FsWebspaceSource {
    dir: PathBuf,
}

impl FsWebspaceSource {
    /// Create a source for the webspace files in `dir`.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory the webspace files are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl WebspaceSource for FsWebspaceSource {
    fn load(&self) -> Result<Vec<LoadedWebspace>, SourceError> {
        let mut loaded = Vec::new();
        let mut webspace_keys = HashSet::new();
        let mut portal_keys = HashSet::new();

        for path in scanner::scan(&self.dir)? {
            let content = read(&path)?;
            let webspace = parse(&path, &content)?;

            if !webspace_keys.insert(webspace.key.clone()) {
                return Err(invalid(
                    &path,
                    format!("duplicate webspace key \"{}\"", webspace.key),
                ));
            }
            for portal in &webspace.portals {
                if !portal_keys.insert(portal.key.clone()) {
                    return Err(invalid(
                        &path,
                        format!("duplicate portal key \"{}\"", portal.key),
                    ));
                }
            }

            tracing::debug!(path = %path.display(), webspace = %webspace.key, "Webspace loaded");
            loaded.push(LoadedWebspace {
                webspace,
                resource: FileResource {
                    fingerprint: fingerprint(&content),
                    path,
                },
            });
        }

        Ok(loaded)
    }

    fn resources(&self) -> Result<Vec<FileResource>, SourceError> {
        scanner::scan(&self.dir)?
            .into_iter()
            .map(|path| {
                let content = read(&path)?;
                Ok(FileResource {
                    fingerprint: fingerprint(&content),
                    path,
                })
            })
            .collect()
    }
}

fn read(path: &Path) -> Result<Vec<u8>, SourceError> {
    fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// SHA-256 of the file content, hex encoded.
fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

fn invalid(path: &Path, message: String) -> SourceError {
    SourceError::Invalid {
        path: path.to_path_buf(),
        message,
    }
}

/// Parse and check one webspace file.
fn parse(path: &Path, content: &[u8]) -> Result<Webspace, SourceError> {
    let parse_error = |message: String| SourceError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let text = std::str::from_utf8(content).map_err(|e| parse_error(e.to_string()))?;
    let webspace: Webspace = toml::from_str(text).map_err(|e| parse_error(e.to_string()))?;

    if webspace.key.is_empty() {
        return Err(invalid(path, "webspace key cannot be empty".to_owned()));
    }
    for portal in &webspace.portals {
        if portal.key.is_empty() {
            return Err(invalid(
                path,
                format!("portal key of webspace \"{}\" cannot be empty", webspace.key),
            ));
        }
        if portal.environments.iter().any(|e| e.name.is_empty()) {
            return Err(invalid(
                path,
                format!("environment type of portal \"{}\" cannot be empty", portal.key),
            ));
        }
    }

    Ok(webspace)
}
