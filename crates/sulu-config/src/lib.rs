//! Configuration management for Sulu.
//!
//! Parses `sulu.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `environment`
//! - `webspaces.dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the deployment environment.
    pub environment: Option<String>,
    /// Override the webspace configuration directory.
    pub webspaces_dir: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sulu.toml";

/// Default deployment environment.
const DEFAULT_ENVIRONMENT: &str = "prod";

/// Default webspace directory relative to the config file.
const DEFAULT_WEBSPACES_DIR: &str = "config/webspaces";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment environment whose URLs are used (e.g., "prod").
    pub environment: String,
    /// Webspace configuration (paths are relative strings from TOML).
    webspaces: WebspacesConfigRaw,
    /// Content templates.
    pub templates: TemplatesConfig,

    /// Resolved webspace configuration (set after loading).
    #[serde(skip)]
    pub webspaces_resolved: WebspacesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw webspace configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct WebspacesConfigRaw {
    dir: Option<String>,
    cache_enabled: Option<bool>,
}

/// Resolved webspace configuration with absolute paths.
#[derive(Debug, Default)]
pub struct WebspacesConfig {
    /// Directory containing webspace configuration files.
    pub dir: PathBuf,
    /// Project directory for Sulu data (.sulu/).
    pub project_dir: PathBuf,
    /// Whether the built collection is cached.
    pub cache_enabled: bool,
}

impl WebspacesConfig {
    /// Cache directory path (.sulu/cache/).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.project_dir.join("cache")
    }
}

/// Content template configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Template names webspaces may use as defaults.
    pub available: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`webspaces.dir`").
        field: String,
        /// Error message (e.g., "${`SULU_ENV`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sulu.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(environment) = &settings.environment {
            self.environment.clone_from(environment);
        }
        if let Some(dir) = &settings.webspaces_dir {
            self.webspaces_resolved.dir.clone_from(dir);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.webspaces_resolved.cache_enabled = cache_enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            webspaces: WebspacesConfigRaw::default(),
            templates: TemplatesConfig::default(),
            webspaces_resolved: WebspacesConfig {
                dir: base.join(DEFAULT_WEBSPACES_DIR),
                project_dir: base.join(".sulu"),
                cache_enabled: true,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.environment, "environment")?;
        for template in &self.templates.available {
            require_non_empty(template, "templates.available")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.environment = expand::expand_env(&self.environment, "environment")?;

        if let Some(ref dir) = self.webspaces.dir {
            self.webspaces.dir = Some(expand::expand_env(dir, "webspaces.dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.webspaces_resolved = WebspacesConfig {
            dir: config_dir.join(
                self.webspaces
                    .dir
                    .as_deref()
                    .unwrap_or(DEFAULT_WEBSPACES_DIR),
            ),
            project_dir: config_dir.join(".sulu"),
            cache_enabled: self.webspaces.cache_enabled.unwrap_or(true),
        };
    }
}
