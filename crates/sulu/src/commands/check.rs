//! `sulu check` command implementation.

use std::path::PathBuf;

use clap::Args;
use sulu_config::{CliSettings, Config};
use sulu_webspace::{MatchType, WebspaceCollection, WebspaceSource};

use crate::commands::{collection_builder, webspace_source};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover sulu.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Webspace configuration directory (overrides config).
    #[arg(short, long)]
    webspaces_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Always builds from source, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a webspace file is invalid,
    /// or template validation fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            webspaces_dir: self.webspaces_dir,
            cache_enabled: Some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = webspace_source(&config);
        output.info(&format!("Checking webspaces in {}", source.dir().display()));

        let webspaces = source.load()?;
        if webspaces.is_empty() {
            output.warning("No webspace files found");
        }

        let collection = collection_builder(&config).build(webspaces)?;

        output.info(&format!(
            "{} webspace(s), {} portal(s)",
            collection.webspaces().len(),
            collection.portals().count()
        ));
        for line in environment_summary(&collection) {
            output.highlight(&line);
        }

        output.success("Webspace configuration is valid");
        Ok(())
    }
}

/// One line per environment with entry counts by match type.
fn environment_summary(collection: &WebspaceCollection) -> Vec<String> {
    const TYPES: [MatchType; 4] = [
        MatchType::Full,
        MatchType::Partial,
        MatchType::Redirect,
        MatchType::Wildcard,
    ];

    collection
        .environments()
        .map(|environment| {
            let counts: Vec<String> = TYPES
                .iter()
                .map(|match_type| {
                    let count = collection
                        .portal_informations_of_type(environment, std::slice::from_ref(match_type))
                        .count();
                    format!("{count} {match_type}")
                })
                .collect();
            format!("{environment}: {}", counts.join(", "))
        })
        .collect()
}
