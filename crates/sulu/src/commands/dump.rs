//! `sulu dump` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use sulu_config::{CliSettings, Config};
use sulu_webspace::{MatchType, PortalInformation, WebspaceCollection};

use crate::commands::webspace_manager;
use crate::error::CliError;
use crate::output::Output;

/// Output format of the dump command.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum Format {
    /// One aligned line per entry.
    #[default]
    Text,
    /// JSON array of entries.
    Json,
}

/// Match type filter.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum TypeFilter {
    Full,
    Partial,
    Redirect,
    Wildcard,
}

impl From<TypeFilter> for MatchType {
    fn from(filter: TypeFilter) -> Self {
        match filter {
            TypeFilter::Full => Self::Full,
            TypeFilter::Partial => Self::Partial,
            TypeFilter::Redirect => Self::Redirect,
            TypeFilter::Wildcard => Self::Wildcard,
        }
    }
}

/// Arguments for the dump command.
#[derive(Args)]
pub(crate) struct DumpArgs {
    /// Path to configuration file (default: auto-discover sulu.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment to dump (overrides config).
    #[arg(short, long, env = "SULU_ENVIRONMENT")]
    environment: Option<String>,

    /// Webspace configuration directory (overrides config).
    #[arg(short, long)]
    webspaces_dir: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Only show entries of these match types.
    #[arg(short = 't', long = "type", value_enum)]
    types: Vec<TypeFilter>,

    /// Disable caching.
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl DumpArgs {
    /// Execute the dump command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or building fails, or the
    /// environment has no URLs.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            environment: self.environment,
            webspaces_dir: self.webspaces_dir,
            cache_enabled: self.no_cache.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let manager = webspace_manager(&config)?;
        let collection = manager.reload_if_needed()?;

        let types: Vec<MatchType> = self.types.into_iter().map(Into::into).collect();
        let selected = select_entries(&collection, &config.environment, &types)?;

        match self.format {
            Format::Text => {
                for info in &selected {
                    output.data(&format_entry(info));
                }
            }
            Format::Json => output.data(&serde_json::to_string_pretty(&selected)?),
        }

        Ok(())
    }
}

/// Entries of `environment` in match order, restricted to `types` unless empty.
///
/// # Errors
///
/// Returns [`CliError::Validation`] if the environment has no entries.
fn select_entries<'a>(
    collection: &'a WebspaceCollection,
    environment: &str,
    types: &[MatchType],
) -> Result<Vec<&'a PortalInformation>, CliError> {
    let infos = collection.portal_informations(environment).ok_or_else(|| {
        CliError::Validation(format!(
            "No URLs configured for environment \"{environment}\""
        ))
    })?;
    tracing::info!(environment, entries = infos.len(), "Dumping portal informations");

    Ok(infos
        .iter()
        .filter(|info| types.is_empty() || types.contains(&info.match_type()))
        .collect())
}

/// One line describing `info`.
///
/// `priority  type  url  webspace/portal  locale  [-> redirect]  [main]`
fn format_entry(info: &PortalInformation) -> String {
    let locale = info
        .localization()
        .map_or_else(|| "-".to_owned(), ToString::to_string);
    let mut line = format!(
        "{:>2}  {:<8}  {}  {}/{}  {}",
        info.priority,
        info.match_type(),
        info.url,
        info.webspace_key,
        info.portal_key,
        locale
    );
    if let Some(redirect) = info.redirect() {
        line.push_str("  -> ");
        line.push_str(redirect);
    }
    if info.is_main() {
        line.push_str("  main");
    }
    line
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use sulu_webspace::{BuildError, Localization, ManagerError, Match};

    use super::*;

    const ACME: &str = r#"
key = "acme"
name = "ACME"

[default_templates]
page = "default"

[[portals]]
key = "acme"
name = "ACME"
localizations = [{ language = "en", default = true }, { language = "de" }]

[[portals.environments]]
type = "prod"
urls = [
    { url = "{language}.acme.com", main = true },
    { url = "www.acme.com", redirect = "en.acme.com" },
]
custom_urls = [{ url = "*.acme.com" }]
"#;

    fn create_project(dir: &Path, available: &str) {
        std::fs::write(
            dir.join("sulu.toml"),
            format!("[templates]\navailable = [{available}]\n"),
        )
        .unwrap();
        std::fs::create_dir_all(dir.join("config/webspaces")).unwrap();
        std::fs::write(dir.join("config/webspaces/acme.toml"), ACME).unwrap();
    }

    fn load_collection(dir: &Path) -> Result<Arc<WebspaceCollection>, CliError> {
        let config = Config::load(Some(&dir.join("sulu.toml")), Some(&CliSettings::default()))?;
        Ok(webspace_manager(&config)?.reload_if_needed()?)
    }

    fn urls(entries: &[&PortalInformation]) -> Vec<String> {
        entries.iter().map(|info| info.url.clone()).collect()
    }

    #[test]
    fn test_select_all_entries_in_match_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        create_project(temp_dir.path(), r#""default""#);
        let collection = load_collection(temp_dir.path()).unwrap();

        let entries = select_entries(&collection, "prod", &[]).unwrap();

        assert_eq!(
            urls(&entries),
            vec![
                "www.acme.com",
                "en.acme.com",
                "de.acme.com",
                "*.acme.com",
                "acme.com"
            ]
        );
    }

    #[test]
    fn test_select_entries_by_type() {
        let temp_dir = tempfile::tempdir().unwrap();
        create_project(temp_dir.path(), r#""default""#);
        let collection = load_collection(temp_dir.path()).unwrap();

        let entries =
            select_entries(&collection, "prod", &[MatchType::Wildcard, MatchType::Redirect])
                .unwrap();

        assert_eq!(urls(&entries), vec!["www.acme.com", "*.acme.com"]);
    }

    #[test]
    fn test_select_unknown_environment_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        create_project(temp_dir.path(), r#""default""#);
        let collection = load_collection(temp_dir.path()).unwrap();

        let err = select_entries(&collection, "stage", &[]).unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert!(err.to_string().contains("\"stage\""));
    }

    #[test]
    fn test_removed_template_is_not_served_from_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        create_project(temp_dir.path(), r#""default""#);
        load_collection(temp_dir.path()).unwrap();
        assert!(temp_dir.path().join(".sulu/cache/webspaces.json").exists());

        create_project(temp_dir.path(), r#""homepage""#);
        let result = load_collection(temp_dir.path());

        assert!(matches!(
            result,
            Err(CliError::Manager(ManagerError::Build(
                BuildError::UnknownTemplate { .. }
            )))
        ));
    }

    fn info(url: &str, priority: u8, kind: Match) -> PortalInformation {
        PortalInformation {
            webspace_key: "acme".to_owned(),
            portal_key: "acme-portal".to_owned(),
            url: url.to_owned(),
            url_expression: url.to_owned(),
            priority,
            kind,
        }
    }

    #[test]
    fn test_format_full_entry() {
        let line = format_entry(&info(
            "en.acme.com",
            10,
            Match::Full {
                localization: Some(Localization::new("en", Some("us"))),
                main: true,
            },
        ));
        assert_eq!(line, "10  full      en.acme.com  acme/acme-portal  en_us  main");
    }

    #[test]
    fn test_format_redirect_entry() {
        let line = format_entry(&info(
            "old.acme.com",
            9,
            Match::Redirect {
                redirect: "new.acme.com".to_owned(),
                main: false,
            },
        ));
        assert_eq!(
            line,
            " 9  redirect  old.acme.com  acme/acme-portal  -  -> new.acme.com"
        );
    }

    #[test]
    fn test_format_wildcard_entry() {
        let line = format_entry(&info("*.acme.com", 1, Match::Wildcard));
        assert_eq!(line, " 1  wildcard  *.acme.com  acme/acme-portal  -");
    }
}
