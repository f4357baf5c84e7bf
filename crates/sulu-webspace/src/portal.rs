//! Portals and their per-environment URL configuration.

use serde::{Deserialize, Serialize};

use crate::localization::Localization;

/// A deployable grouping of localizations and environments within a webspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    /// Unique portal key.
    pub key: String,
    /// Human readable name.
    #[serde(default)]
    pub name: String,
    /// Localizations served by this portal.
    #[serde(default)]
    pub localizations: Vec<Localization>,
    /// Deployment environments, in configuration order.
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl Portal {
    /// Find the localization with the given underscore locale (e.g., `en_us`).
    #[must_use]
    pub fn localization(&self, locale: &str) -> Option<&Localization> {
        self.localizations.iter().find(|l| l.locale() == locale)
    }

    /// The localization flagged as default, else the first one.
    #[must_use]
    pub fn default_localization(&self) -> Option<&Localization> {
        self.localizations
            .iter()
            .find(|l| l.default)
            .or_else(|| self.localizations.first())
    }

    /// Find an environment by its type name.
    #[must_use]
    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }
}

/// A deployment stage (dev, stage, prod) with its own URL set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment type (e.g., "prod").
    #[serde(rename = "type")]
    pub name: String,
    /// URL entries, in configuration order.
    #[serde(default)]
    pub urls: Vec<Url>,
    /// Wildcard URL patterns.
    #[serde(default)]
    pub custom_urls: Vec<CustomUrl>,
}

/// A URL template of an environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    /// Template, possibly containing placeholders.
    pub url: String,
    /// Fixed language. Without it the URL expands to every portal localization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Fixed country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Redirect target. A redirect URL never resolves to content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    /// Marks the canonical URL of a locale.
    #[serde(default)]
    pub main: bool,
}

impl Url {
    /// Create a plain URL template without fixed locale or redirect.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Fixed language if set and non-empty.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref().filter(|l| !l.is_empty())
    }

    /// Fixed country if set and non-empty.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref().filter(|c| !c.is_empty())
    }

    /// Redirect target if set and non-empty.
    #[must_use]
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref().filter(|r| !r.is_empty())
    }
}

/// Operator-defined wildcard pattern, matched verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomUrl {
    /// The pattern (e.g., `*.example.com/campaign`).
    pub url: String,
}
