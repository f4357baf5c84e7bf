//! Placeholder substitution in URL templates.
//!
//! Webspace URLs are templates such as `{language}.example.com/{segment}`.
//! The functions here substitute or strip single placeholders. Stripping a
//! placeholder also removes one separator next to it so that
//! `{language}.example.com` becomes `example.com` and
//! `example.com/{localization}` becomes `example.com`.

use std::fmt;

/// Placeholders recognized in URL templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `{language}`
    Language,
    /// `{country}`
    Country,
    /// `{localization}`
    Localization,
    /// `{segment}`
    Segment,
    /// `{host}`
    Host,
}

impl Placeholder {
    /// Placeholders stripped from a template to produce its partial match key.
    pub const LOCALE_AND_SEGMENT: [Self; 4] = [
        Self::Language,
        Self::Country,
        Self::Localization,
        Self::Segment,
    ];

    /// Token as written in URL templates.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Language => "{language}",
            Self::Country => "{country}",
            Self::Localization => "{localization}",
            Self::Segment => "{segment}",
            Self::Host => "{host}",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, '.' | '/' | '-' | '_')
}

/// Whether `url` still contains the `{host}` placeholder.
#[must_use]
pub fn has_host_replacer(url: &str) -> bool {
    has_replacer(url, Placeholder::Host)
}

/// Whether `url` contains `placeholder`.
#[must_use]
pub fn has_replacer(url: &str, placeholder: Placeholder) -> bool {
    url.contains(placeholder.token())
}

/// Substitute every occurrence of `placeholder` in `pattern` with `value`.
///
/// An empty `value` removes the token together with one adjacent separator,
/// preferring the separator in front of it.
#[must_use]
pub fn replace(pattern: &str, placeholder: Placeholder, value: &str) -> String {
    let token = placeholder.token();
    if !pattern.contains(token) {
        return pattern.to_owned();
    }
    if !value.is_empty() {
        return pattern.replace(token, value);
    }

    let mut result = pattern.to_owned();
    while let Some(start) = result.find(token) {
        let end = start + token.len();
        if result[..start].ends_with(is_separator) {
            // separators are single-byte ASCII
            result.replace_range(start - 1..end, "");
        } else if result[end..].starts_with(is_separator) {
            result.replace_range(start..=end, "");
        } else {
            result.replace_range(start..end, "");
        }
    }
    result
}

/// Strip all `placeholders` from `pattern`.
#[must_use]
pub fn cleanup(pattern: &str, placeholders: &[Placeholder]) -> String {
    placeholders
        .iter()
        .fold(pattern.to_owned(), |url, &placeholder| {
            replace(&url, placeholder, "")
        })
}
