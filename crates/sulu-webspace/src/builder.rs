//! Portal information builder.
//!
//! Walks every webspace, portal, environment and URL and produces the routing
//! table of each environment:
//!
//! | source | match | key | priority |
//! |--------|-------|-----|----------|
//! | URL with redirect | redirect | literal URL | 4 with `{host}`, else 9 |
//! | URL, once per localization (or once for a fixed language) | full | resolved URL | 5 with `{host}`, else 10 |
//! | URL without redirect | partial | URL without locale/segment placeholders | 4 with `{host}`, else 9 |
//! | custom URL | wildcard | literal pattern | 1 |
//!
//! A partial match is dropped when its key is already taken in the
//! environment or ends with `.`. Entries are finally ordered by descending
//! key length, keeping insertion order for equal lengths.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use crate::collection::WebspaceCollection;
use crate::error::BuildError;
use crate::localization::Localization;
use crate::portal::{Environment, Portal, Url};
use crate::portal_information::{Match, MatchType, PortalInformation};
use crate::replacer::{self, Placeholder};
use crate::webspace::{LoadedWebspace, Webspace};

/// Builds a [`WebspaceCollection`] from loaded webspaces.
///
/// The builder keeps no state between calls, so one instance can be shared
/// and reused.
#[derive(Debug, Clone, Default)]
pub struct WebspaceCollectionBuilder {
    available_templates: HashSet<String>,
}

impl WebspaceCollectionBuilder {
    /// Create a builder validating default templates against `available_templates`.
    #[must_use]
    pub fn new<I, S>(available_templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available_templates: available_templates.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the collection.
    ///
    /// Webspaces are processed in the given order, which should be the
    /// file name order of their configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] for the first webspace whose default templates
    /// are unavailable or excluded. No collection is produced in that case.
    pub fn build(
        &self,
        configs: impl IntoIterator<Item = LoadedWebspace>,
    ) -> Result<WebspaceCollection, BuildError> {
        let start = Instant::now();

        let mut webspaces = Vec::new();
        let mut resources = Vec::new();
        let mut environments: BTreeMap<String, EnvironmentEntries> = BTreeMap::new();

        for LoadedWebspace { webspace, resource } in configs {
            resources.push(resource);
            self.validate_templates(&webspace)?;

            for portal in &webspace.portals {
                for environment in &portal.environments {
                    let entries = environments
                        .entry(environment.name.clone())
                        .or_insert_with(|| EnvironmentEntries::new(&environment.name));
                    build_environment(&webspace, portal, environment, entries);
                }
            }

            tracing::debug!(
                webspace = %webspace.key,
                portal_count = webspace.portals.len(),
                "Webspace processed"
            );
            webspaces.push(webspace);
        }

        let portal_informations: BTreeMap<_, _> = environments
            .into_iter()
            .map(|(name, entries)| (name, entries.into_sorted()))
            .collect();

        tracing::info!(
            webspace_count = webspaces.len(),
            environment_count = portal_informations.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Webspace collection built"
        );

        Ok(WebspaceCollection::new(
            webspaces,
            portal_informations,
            resources,
            self.available_templates(),
        ))
    }

    /// Available templates in sorted order.
    #[must_use]
    pub fn available_templates(&self) -> Vec<String> {
        let mut templates: Vec<String> = self.available_templates.iter().cloned().collect();
        templates.sort();
        templates
    }

    /// Check every default template of `webspace`.
    fn validate_templates(&self, webspace: &Webspace) -> Result<(), BuildError> {
        for template in webspace.default_templates.values() {
            if !self.available_templates.contains(template) {
                return Err(BuildError::UnknownTemplate {
                    webspace: webspace.key.clone(),
                    template: template.clone(),
                });
            }
            if webspace.is_excluded(template) {
                return Err(BuildError::ExcludedTemplate {
                    webspace: webspace.key.clone(),
                    template: template.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Routing entries of one environment while building.
struct EnvironmentEntries {
    name: String,
    entries: Vec<PortalInformation>,
    positions: HashMap<String, usize>,
}

impl EnvironmentEntries {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Insert a full, redirect or wildcard entry.
    ///
    /// Replaces a partial entry with the same key in place. Any other entry
    /// with the same key wins over `info`.
    fn insert(&mut self, info: PortalInformation) {
        match self.positions.get(&info.url) {
            None => {
                self.positions.insert(info.url.clone(), self.entries.len());
                self.entries.push(info);
            }
            Some(&index) if self.entries[index].match_type() == MatchType::Partial => {
                self.entries[index] = info;
            }
            Some(&index) if same_origin(&self.entries[index], &info) => {
                tracing::debug!(
                    environment = %self.name,
                    url = %info.url,
                    portal = %info.portal_key,
                    "URL resolves identically for several localizations"
                );
            }
            Some(&index) => {
                tracing::warn!(
                    environment = %self.name,
                    url = %info.url,
                    kept_portal = %self.entries[index].portal_key,
                    ignored_portal = %info.portal_key,
                    "Duplicate URL, keeping first definition"
                );
            }
        }
    }

    /// Insert a partial entry unless its key is taken or ends with a dot.
    fn insert_partial(&mut self, info: PortalInformation) {
        if self.positions.contains_key(&info.url) || info.url.ends_with('.') {
            tracing::trace!(
                environment = %self.name,
                url = %info.url,
                "Partial match skipped"
            );
            return;
        }
        self.positions.insert(info.url.clone(), self.entries.len());
        self.entries.push(info);
    }

    /// Entries ordered by descending URL length. The sort is stable.
    fn into_sorted(mut self) -> Vec<PortalInformation> {
        self.entries.sort_by_key(|info| Reverse(info.url.len()));
        self.entries
    }
}

/// Whether both entries come from the same URL template of the same portal.
fn same_origin(kept: &PortalInformation, other: &PortalInformation) -> bool {
    kept.webspace_key == other.webspace_key
        && kept.portal_key == other.portal_key
        && kept.url_expression == other.url_expression
}

/// Priority for entries that could still contain a `{host}` placeholder.
fn host_priority(url: &str, with_host: u8, without_host: u8) -> u8 {
    if replacer::has_host_replacer(url) {
        with_host
    } else {
        without_host
    }
}

fn build_environment(
    webspace: &Webspace,
    portal: &Portal,
    environment: &Environment,
    entries: &mut EnvironmentEntries,
) {
    let context = Context { webspace, portal };

    for url in &environment.urls {
        if let Some(redirect) = url.redirect() {
            entries.insert(context.redirect(url, redirect));
        } else {
            build_urls(&context, url, entries);
        }
    }

    for custom_url in &environment.custom_urls {
        entries.insert(context.info(&custom_url.url, &custom_url.url, 1, Match::Wildcard));
    }
}

/// Full matches for every localization of `url`, then its partial match.
fn build_urls(context: &Context<'_>, url: &Url, entries: &mut EnvironmentEntries) {
    if let Some(language) = url.language() {
        let country = url.country();
        let locale = match country {
            Some(country) => format!("{language}_{country}"),
            None => language.to_owned(),
        };
        let replacers = [
            (Placeholder::Language, language),
            (Placeholder::Country, country.unwrap_or_default()),
            (Placeholder::Localization, locale.as_str()),
        ];
        let localization = context.portal.localization(&locale).cloned();
        entries.insert(context.full(url, &replacers, localization));
    } else {
        for localization in &context.portal.localizations {
            let language = url.language().unwrap_or(&localization.language);
            let country = url
                .country()
                .or(localization.country.as_deref())
                .unwrap_or_default();
            let dash_locale = localization.dash_locale();
            let replacers = [
                (Placeholder::Language, language),
                (Placeholder::Country, country),
                (Placeholder::Localization, dash_locale.as_str()),
            ];
            entries.insert(context.full(url, &replacers, Some(localization.clone())));
        }
    }

    entries.insert_partial(context.partial(url));
}

/// Owners of the entries being built.
struct Context<'a> {
    webspace: &'a Webspace,
    portal: &'a Portal,
}

impl Context<'_> {
    fn info(&self, url: &str, expression: &str, priority: u8, kind: Match) -> PortalInformation {
        PortalInformation {
            webspace_key: self.webspace.key.clone(),
            portal_key: self.portal.key.clone(),
            url: url.to_owned(),
            url_expression: expression.to_owned(),
            priority,
            kind,
        }
    }

    fn redirect(&self, url: &Url, redirect: &str) -> PortalInformation {
        self.info(
            &url.url,
            &url.url,
            host_priority(&url.url, 4, 9),
            Match::Redirect {
                redirect: redirect.to_owned(),
                main: url.main,
            },
        )
    }

    fn full(
        &self,
        url: &Url,
        replacers: &[(Placeholder, &str)],
        localization: Option<Localization>,
    ) -> PortalInformation {
        let resolved = replacers
            .iter()
            .fold(url.url.clone(), |pattern, &(placeholder, value)| {
                replacer::replace(&pattern, placeholder, value)
            });
        self.info(
            &resolved,
            &url.url,
            host_priority(&resolved, 5, 10),
            Match::Full {
                localization,
                main: url.main,
            },
        )
    }

    fn partial(&self, url: &Url) -> PortalInformation {
        let stripped = replacer::cleanup(&url.url, &Placeholder::LOCALE_AND_SEGMENT);
        self.info(
            &stripped,
            &url.url,
            host_priority(&stripped, 4, 9),
            Match::Partial {
                redirect: url.url.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::portal::CustomUrl;
    use crate::webspace::FileResource;

    fn loaded(webspace: Webspace) -> LoadedWebspace {
        let resource = FileResource {
            path: PathBuf::from(format!("{}.toml", webspace.key)),
            fingerprint: "0".to_owned(),
        };
        LoadedWebspace { webspace, resource }
    }

    fn webspace(key: &str, urls: Vec<Url>) -> Webspace {
        Webspace {
            key: key.to_owned(),
            name: key.to_owned(),
            localizations: Vec::new(),
            default_templates: BTreeMap::new(),
            excluded_templates: Vec::new(),
            theme: None,
            portals: vec![Portal {
                key: key.to_owned(),
                name: key.to_owned(),
                localizations: vec![
                    Localization::new("en", Some("us")),
                    Localization::new("de", Some("de")),
                ],
                environments: vec![Environment {
                    name: "prod".to_owned(),
                    urls,
                    custom_urls: Vec::new(),
                }],
            }],
        }
    }

    fn build(webspaces: Vec<Webspace>) -> WebspaceCollection {
        WebspaceCollectionBuilder::default()
            .build(webspaces.into_iter().map(loaded))
            .unwrap()
    }

    fn keys(collection: &WebspaceCollection, environment: &str) -> Vec<String> {
        collection
            .portal_informations(environment)
            .unwrap()
            .iter()
            .map(|info| info.url.clone())
            .collect()
    }

    #[test]
    fn test_language_placeholder_expands_per_localization() {
        let collection = build(vec![webspace("acme", vec![Url::new("{language}.acme.com")])]);

        let infos = collection.portal_informations("prod").unwrap();
        assert_eq!(infos.len(), 3);

        let en = collection.portal_information("prod", "en.acme.com").unwrap();
        assert_eq!(en.match_type(), MatchType::Full);
        assert_eq!(en.priority, 10);
        assert_eq!(en.localization(), Some(&Localization::new("en", Some("us"))));
        assert_eq!(en.url_expression, "{language}.acme.com");

        let de = collection.portal_information("prod", "de.acme.com").unwrap();
        assert_eq!(de.match_type(), MatchType::Full);

        let partial = collection.portal_information("prod", "acme.com").unwrap();
        assert_eq!(partial.match_type(), MatchType::Partial);
        assert_eq!(partial.priority, 9);
        assert!(!partial.is_main());
        assert_eq!(partial.localization(), None);
        assert_eq!(partial.redirect(), Some("{language}.acme.com"));
    }

    #[test]
    fn test_localization_placeholder_uses_dash_form() {
        let collection = build(vec![webspace(
            "acme",
            vec![Url::new("acme.com/{localization}")],
        )]);

        assert_eq!(
            keys(&collection, "prod"),
            vec!["acme.com/en-us", "acme.com/de-de", "acme.com"]
        );
    }

    #[test]
    fn test_country_placeholder() {
        let collection = build(vec![webspace(
            "acme",
            vec![Url::new("acme.com/{language}/{country}")],
        )]);

        assert!(collection.portal_information("prod", "acme.com/en/us").is_some());
        assert!(collection.portal_information("prod", "acme.com/de/de").is_some());
        assert!(collection.portal_information("prod", "acme.com").is_some());
    }

    #[test]
    fn test_fixed_language_builds_one_full_match() {
        let url = Url {
            language: Some("en".to_owned()),
            country: Some("us".to_owned()),
            main: true,
            ..Url::new("acme.com/{localization}")
        };
        let collection = build(vec![webspace("acme", vec![url])]);

        let fulls: Vec<_> = collection
            .portal_informations_of_type("prod", &[MatchType::Full])
            .collect();
        assert_eq!(fulls.len(), 1);
        assert_eq!(fulls[0].url, "acme.com/en_us");
        assert!(fulls[0].is_main());
        assert_eq!(
            fulls[0].localization(),
            Some(&Localization::new("en", Some("us")))
        );
    }

    #[test]
    fn test_fixed_language_without_portal_localization() {
        let url = Url {
            language: Some("fr".to_owned()),
            ..Url::new("fr.acme.com")
        };
        let collection = build(vec![webspace("acme", vec![url])]);

        let full = collection.portal_information("prod", "fr.acme.com").unwrap();
        assert_eq!(full.match_type(), MatchType::Full);
        assert_eq!(full.localization(), None);
        // the partial key equals the full key and is dropped
        assert_eq!(keys(&collection, "prod"), vec!["fr.acme.com"]);
    }

    #[test]
    fn test_partial_colliding_with_full_is_dropped() {
        let collection = build(vec![webspace("acme", vec![Url::new("acme.com")])]);

        // both localizations resolve to the same key, the first one wins
        let infos = collection.portal_informations("prod").unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].match_type(), MatchType::Full);
        assert_eq!(
            infos[0].localization(),
            Some(&Localization::new("en", Some("us")))
        );
    }

    #[test]
    fn test_same_origin_distinguishes_portals_and_templates() {
        let collection = build(vec![
            webspace("acme", vec![Url::new("acme.com"), Url::new("{language}.acme.com")]),
            webspace("other", vec![Url::new("acme.com")]),
        ]);
        let infos = collection.portal_informations("prod").unwrap();
        let kept = collection.portal_information("prod", "acme.com").unwrap();

        let mut same_template = kept.clone();
        same_template.kind = Match::Full {
            localization: Some(Localization::new("de", Some("de"))),
            main: false,
        };
        assert!(same_origin(kept, &same_template));

        let other_portal = PortalInformation {
            webspace_key: "other".to_owned(),
            portal_key: "other".to_owned(),
            ..kept.clone()
        };
        assert!(!same_origin(kept, &other_portal));

        let other_template = infos
            .iter()
            .find(|info| info.url == "en.acme.com")
            .unwrap();
        assert!(!same_origin(kept, other_template));
        assert_eq!(kept.webspace_key, "acme");
    }

    #[test]
    fn test_partial_ending_with_dot_is_dropped() {
        let collection = build(vec![webspace("acme", vec![Url::new("acme.{language}.")])]);

        assert_eq!(
            collection
                .portal_informations_of_type("prod", &[MatchType::Partial])
                .count(),
            0
        );
    }

    #[test]
    fn test_full_replaces_earlier_partial() {
        let fixed = Url {
            language: Some("en".to_owned()),
            country: Some("us".to_owned()),
            ..Url::new("acme.com")
        };
        let collection = build(vec![webspace(
            "acme",
            vec![Url::new("{language}.acme.com"), fixed],
        )]);

        let info = collection.portal_information("prod", "acme.com").unwrap();
        assert_eq!(info.match_type(), MatchType::Full);
        assert_eq!(info.url_expression, "acme.com");
        assert_eq!(collection.portal_informations("prod").unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_full_keeps_first() {
        let mut first = webspace("first", vec![Url::new("{language}.acme.com")]);
        first.portals[0].localizations.truncate(1);
        let mut second = webspace("second", vec![Url::new("{language}.acme.com")]);
        second.portals[0].localizations.truncate(1);

        let collection = build(vec![first, second]);

        let info = collection.portal_information("prod", "en.acme.com").unwrap();
        assert_eq!(info.webspace_key, "first");
        assert_eq!(collection.portal_informations("prod").unwrap().len(), 2);
    }

    #[test]
    fn test_redirect() {
        let url = Url {
            redirect: Some("new.acme.com".to_owned()),
            ..Url::new("old.acme.com")
        };
        let collection = build(vec![webspace("acme", vec![url])]);

        let infos = collection.portal_informations("prod").unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].match_type(), MatchType::Redirect);
        assert_eq!(infos[0].url, "old.acme.com");
        assert_eq!(infos[0].redirect(), Some("new.acme.com"));
        assert_eq!(infos[0].priority, 9);
    }

    #[test]
    fn test_redirect_with_host_placeholder() {
        let url = Url {
            redirect: Some("acme.com".to_owned()),
            ..Url::new("{host}/old")
        };
        let collection = build(vec![webspace("acme", vec![url])]);

        let info = collection.portal_information("prod", "{host}/old").unwrap();
        assert_eq!(info.priority, 4);
    }

    #[test]
    fn test_host_placeholder_priorities() {
        let collection = build(vec![webspace("acme", vec![Url::new("{host}/{localization}")])]);

        let full = collection.portal_information("prod", "{host}/en-us").unwrap();
        assert_eq!(full.priority, 5);
        let partial = collection.portal_information("prod", "{host}").unwrap();
        assert_eq!(partial.match_type(), MatchType::Partial);
        assert_eq!(partial.priority, 4);
    }

    #[test]
    fn test_segment_placeholder_stays_in_full_key() {
        let collection = build(vec![webspace(
            "acme",
            vec![Url::new("acme.com/{segment}/{localization}")],
        )]);

        assert!(
            collection
                .portal_information("prod", "acme.com/{segment}/en-us")
                .is_some()
        );
        assert!(collection.portal_information("prod", "acme.com").is_some());
    }

    #[test]
    fn test_custom_urls_are_wildcards() {
        let mut webspace = webspace("acme", Vec::new());
        webspace.portals[0].environments[0].custom_urls = vec![CustomUrl {
            url: "*.acme.com/campaign".to_owned(),
        }];
        let collection = build(vec![webspace]);

        let info = collection
            .portal_information("prod", "*.acme.com/campaign")
            .unwrap();
        assert_eq!(info.match_type(), MatchType::Wildcard);
        assert_eq!(info.priority, 1);
        assert!(!info.is_main());
        assert_eq!(info.localization(), None);
        assert_eq!(info.redirect(), None);
    }

    #[test]
    fn test_sorted_by_descending_length_keeping_insertion_order() {
        let mut webspace = webspace(
            "acme",
            vec![
                Url {
                    language: Some("en".to_owned()),
                    ..Url::new("a.com")
                },
                Url {
                    language: Some("en".to_owned()),
                    ..Url::new("sub.a.com")
                },
                Url {
                    language: Some("en".to_owned()),
                    ..Url::new("x.com/path")
                },
            ],
        );
        webspace.portals[0].environments[0].custom_urls = vec![
            CustomUrl {
                url: "b.com".to_owned(),
            },
            CustomUrl {
                url: "c.com".to_owned(),
            },
        ];
        let collection = build(vec![webspace]);

        assert_eq!(
            keys(&collection, "prod"),
            vec!["x.com/path", "sub.a.com", "a.com", "b.com", "c.com"]
        );
    }

    #[test]
    fn test_environments_are_separate() {
        let mut webspace = webspace("acme", vec![Url::new("acme.com")]);
        webspace.portals[0].environments.push(Environment {
            name: "dev".to_owned(),
            urls: vec![Url::new("acme.lo")],
            custom_urls: Vec::new(),
        });
        let collection = build(vec![webspace]);

        assert_eq!(collection.environments().collect::<Vec<_>>(), vec!["dev", "prod"]);
        assert!(collection.portal_information("dev", "acme.lo").is_some());
        assert!(collection.portal_information("prod", "acme.lo").is_none());
    }

    #[test]
    fn test_collection_resolves_owners() {
        let collection = build(vec![webspace("acme", vec![Url::new("acme.com")])]);

        let info = collection.portal_information("prod", "acme.com").unwrap();
        assert_eq!(collection.webspace_of(info).map(|w| w.key.as_str()), Some("acme"));
        assert_eq!(collection.portal_of(info).map(|p| p.key.as_str()), Some("acme"));
        assert_eq!(collection.portals().count(), 1);
        assert_eq!(collection.resources().len(), 1);
        assert_eq!(collection.resources()[0].path, PathBuf::from("acme.toml"));
    }

    #[test]
    fn test_unknown_default_template_fails_on_first_webspace() {
        let mut first = webspace("first", vec![Url::new("first.com")]);
        first
            .default_templates
            .insert("page".to_owned(), "missing".to_owned());
        let mut second = webspace("second", vec![Url::new("second.com")]);
        second
            .default_templates
            .insert("page".to_owned(), "missing".to_owned());

        let result = WebspaceCollectionBuilder::new(["default"])
            .build([first, second].into_iter().map(loaded));

        let err = result.unwrap_err();
        assert!(
            matches!(&err, BuildError::UnknownTemplate { webspace, template }
                if webspace == "first" && template == "missing"),
            "unexpected error: {err:?}"
        );
        assert!(err.to_string().contains("first"));
    }

    #[test]
    fn test_excluded_default_template_fails() {
        let mut webspace = webspace("acme", vec![Url::new("acme.com")]);
        webspace
            .default_templates
            .insert("page".to_owned(), "default".to_owned());
        webspace.excluded_templates = vec!["default".to_owned()];

        let result = WebspaceCollectionBuilder::new(["default"]).build([loaded(webspace)]);

        assert!(matches!(
            result,
            Err(BuildError::ExcludedTemplate { ref template, .. }) if template == "default"
        ));
    }

    #[test]
    fn test_valid_default_templates() {
        let mut webspace = webspace("acme", vec![Url::new("acme.com")]);
        webspace
            .default_templates
            .insert("page".to_owned(), "default".to_owned());
        webspace
            .default_templates
            .insert("home".to_owned(), "homepage".to_owned());
        webspace.excluded_templates = vec!["legacy".to_owned()];

        let result =
            WebspaceCollectionBuilder::new(["default", "homepage"]).build([loaded(webspace)]);

        assert!(result.is_ok());
    }

    #[test]
    fn test_collection_records_sorted_available_templates() {
        let collection = WebspaceCollectionBuilder::new(["homepage", "default"])
            .build([loaded(webspace("acme", vec![Url::new("acme.com")]))])
            .unwrap();

        assert_eq!(collection.available_templates(), ["default", "homepage"]);
    }

    #[test]
    fn test_builder_is_reusable() {
        let builder = WebspaceCollectionBuilder::default();
        let first = builder
            .build([loaded(webspace("acme", vec![Url::new("acme.com")]))])
            .unwrap();
        let second = builder
            .build([loaded(webspace("other", vec![Url::new("other.com")]))])
            .unwrap();

        assert!(first.portal_information("prod", "other.com").is_none());
        assert!(second.portal_information("prod", "acme.com").is_none());
        assert_eq!(second.webspaces().len(), 1);
    }
}
