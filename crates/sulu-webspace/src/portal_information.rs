//! Resolved routing entries.
//!
//! A [`PortalInformation`] maps one URL key of an environment to a portal.
//! What else it carries depends on the kind of match, see [`Match`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::localization::Localization;

/// Kind of match a routing entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// URL resolved to exactly one localization.
    Full,
    /// Host-only URL that needs locale negotiation.
    Partial,
    /// URL that redirects elsewhere.
    Redirect,
    /// Custom URL pattern matched verbatim.
    Wildcard,
}

impl MatchType {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
            Self::Redirect => "redirect",
            Self::Wildcard => "wildcard",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data specific to the kind of match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Match {
    /// The localization is `None` when a fixed URL language has no portal counterpart.
    Full {
        /// Resolved localization.
        localization: Option<Localization>,
        /// Canonical URL for the localization.
        main: bool,
    },
    /// Partial matches are never main.
    Partial {
        /// Unresolved template to redirect to after negotiation.
        redirect: String,
    },
    /// Redirect to another URL.
    Redirect {
        /// Target URL.
        redirect: String,
        /// Main flag of the configured URL.
        main: bool,
    },
    /// Custom URL.
    Wildcard,
}

/// A resolved routing entry of one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalInformation {
    /// Key of the owning webspace.
    pub webspace_key: String,
    /// Key of the owning portal.
    pub portal_key: String,
    /// Resolved URL, the key of this entry.
    pub url: String,
    /// Template the URL was built from.
    pub url_expression: String,
    /// Higher priorities are tried first among keys of equal length.
    pub priority: u8,
    /// Match specific data.
    #[serde(flatten)]
    pub kind: Match,
}

impl PortalInformation {
    /// Kind of match.
    #[must_use]
    pub fn match_type(&self) -> MatchType {
        match self.kind {
            Match::Full { .. } => MatchType::Full,
            Match::Partial { .. } => MatchType::Partial,
            Match::Redirect { .. } => MatchType::Redirect,
            Match::Wildcard => MatchType::Wildcard,
        }
    }

    /// Resolved localization of a full match.
    #[must_use]
    pub fn localization(&self) -> Option<&Localization> {
        match &self.kind {
            Match::Full { localization, .. } => localization.as_ref(),
            _ => None,
        }
    }

    /// Redirect target of redirect and partial matches.
    #[must_use]
    pub fn redirect(&self) -> Option<&str> {
        match &self.kind {
            Match::Partial { redirect } | Match::Redirect { redirect, .. } => Some(redirect),
            _ => None,
        }
    }

    /// Whether this is the canonical URL of its locale.
    #[must_use]
    pub fn is_main(&self) -> bool {
        match self.kind {
            Match::Full { main, .. } | Match::Redirect { main, .. } => main,
            Match::Partial { .. } | Match::Wildcard => false,
        }
    }

    /// Host part of the URL (everything before the first `/`).
    #[must_use]
    pub fn host(&self) -> &str {
        &self.url[..self.host_length()]
    }

    /// Path part of the URL after the host, with a trailing `/`.
    #[must_use]
    pub fn prefix(&self) -> Option<String> {
        let prefix = self.url.get(self.host_length() + 1..)?;
        if prefix.is_empty() {
            None
        } else {
            Some(format!("{prefix}/"))
        }
    }

    fn host_length(&self) -> usize {
        self.url.find('/').unwrap_or(self.url.len())
    }
}
