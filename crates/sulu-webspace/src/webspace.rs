//! Webspace configuration root.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::localization::Localization;
use crate::portal::Portal;

/// A top-level site configuration.
///
/// Loaded once from a configuration file and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webspace {
    /// Unique webspace key.
    pub key: String,
    /// Human readable name.
    #[serde(default)]
    pub name: String,
    /// Localizations available for content of this webspace.
    #[serde(default)]
    pub localizations: Vec<Localization>,
    /// Default content template per template type (e.g., `page`, `home`).
    #[serde(default)]
    pub default_templates: BTreeMap<String, String>,
    /// Templates that must not be used in this webspace.
    #[serde(default)]
    pub excluded_templates: Vec<String>,
    /// Theme used for rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Portals, in configuration order.
    #[serde(default)]
    pub portals: Vec<Portal>,
}

impl Webspace {
    /// Find a portal of this webspace by key.
    #[must_use]
    pub fn portal(&self, key: &str) -> Option<&Portal> {
        self.portals.iter().find(|p| p.key == key)
    }

    /// Whether `template` is excluded by this webspace.
    #[must_use]
    pub fn is_excluded(&self, template: &str) -> bool {
        self.excluded_templates.iter().any(|t| t == template)
    }
}

/// Identity of a configuration file a collection was built from.
///
/// The fingerprint is opaque to the builder; sources choose what it encodes
/// (the filesystem source uses a content hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResource {
    /// Path of the source file.
    pub path: PathBuf,
    /// Opaque token that changes whenever the file changes.
    pub fingerprint: String,
}

/// A parsed webspace together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedWebspace {
    /// Parsed configuration.
    pub webspace: Webspace,
    /// Source file identity.
    pub resource: FileResource,
}
