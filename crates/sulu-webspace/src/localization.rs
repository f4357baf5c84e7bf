//! Language and country combinations supported by webspaces and portals.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Delimiter used by [`Localization::locale`].
pub const UNDERSCORE: char = '_';

/// Delimiter used by [`Localization::dash_locale`].
pub const DASH: char = '-';

/// A language with an optional country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localization {
    /// Language code (e.g., "en").
    pub language: String,
    /// Country code (e.g., "us").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Marks the fallback localization of a portal.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

impl Localization {
    /// Create a localization that is not flagged as default.
    #[must_use]
    pub fn new(language: impl Into<String>, country: Option<&str>) -> Self {
        Self {
            language: language.into(),
            country: country.map(str::to_owned),
            default: false,
        }
    }

    /// Locale identifier with underscore delimiter (e.g., `en_us`).
    #[must_use]
    pub fn locale(&self) -> String {
        self.locale_with(UNDERSCORE)
    }

    /// Locale identifier with dash delimiter (e.g., `en-us`).
    #[must_use]
    pub fn dash_locale(&self) -> String {
        self.locale_with(DASH)
    }

    /// Locale identifier joined with `delimiter`. Only the language when no country is set.
    #[must_use]
    pub fn locale_with(&self, delimiter: char) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => {
                format!("{}{delimiter}{country}", self.language)
            }
            _ => self.language.clone(),
        }
    }
}

impl fmt::Display for Localization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.locale())
    }
}
