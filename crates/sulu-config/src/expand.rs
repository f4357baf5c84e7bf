//! `${VAR}` references in configuration values.
//!
//! `${VAR}` must be set; `${VAR:-fallback}` falls back when it is not.
//! A bare `$VAR` is left as written.

use std::borrow::Cow;

use crate::ConfigError;

/// Name of an unset variable referenced without a fallback.
struct Unset(String);

fn lookup(name: &str) -> Result<Option<String>, Unset> {
    std::env::var(name)
        .map(Some)
        .map_err(|_| Unset(name.to_owned()))
}

/// Substitute environment variables in the value of config field `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    match shellexpand::env_with_context(value, lookup) {
        Ok(expanded) => Ok(Cow::into_owned(expanded)),
        Err(err) => Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.cause.0),
        }),
    }
}
