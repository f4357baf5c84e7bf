//! Read-only result of a webspace build.
//!
//! [`WebspaceCollection`] owns every webspace (and through them every portal,
//! environment and URL). Portal informations refer back to their webspace and
//! portal by key; resolve those through [`WebspaceCollection::webspace_of`]
//! and [`WebspaceCollection::portal_of`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::portal::Portal;
use crate::portal_information::{MatchType, PortalInformation};
use crate::webspace::{FileResource, Webspace};

/// Webspaces, portals and per-environment routing entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebspaceCollection {
    webspaces: Vec<Webspace>,
    /// Environment name to entries ordered by descending URL length.
    portal_informations: BTreeMap<String, Vec<PortalInformation>>,
    resources: Vec<FileResource>,
    /// Sorted templates the default templates were validated against.
    #[serde(default)]
    available_templates: Vec<String>,
}

impl WebspaceCollection {
    pub(crate) fn new(
        webspaces: Vec<Webspace>,
        portal_informations: BTreeMap<String, Vec<PortalInformation>>,
        resources: Vec<FileResource>,
        available_templates: Vec<String>,
    ) -> Self {
        Self {
            webspaces,
            portal_informations,
            resources,
            available_templates,
        }
    }

    /// All webspaces in build order.
    #[must_use]
    pub fn webspaces(&self) -> &[Webspace] {
        &self.webspaces
    }

    /// Find a webspace by key.
    #[must_use]
    pub fn webspace(&self, key: &str) -> Option<&Webspace> {
        self.webspaces.iter().find(|w| w.key == key)
    }

    /// All portals in build order.
    pub fn portals(&self) -> impl Iterator<Item = &Portal> {
        self.webspaces.iter().flat_map(|w| w.portals.iter())
    }

    /// Find a portal by key.
    #[must_use]
    pub fn portal(&self, key: &str) -> Option<&Portal> {
        self.portals().find(|p| p.key == key)
    }

    /// Webspace owning `info`.
    #[must_use]
    pub fn webspace_of(&self, info: &PortalInformation) -> Option<&Webspace> {
        self.webspace(&info.webspace_key)
    }

    /// Portal owning `info`.
    #[must_use]
    pub fn portal_of(&self, info: &PortalInformation) -> Option<&Portal> {
        self.webspace_of(info)?.portal(&info.portal_key)
    }

    /// Names of all environments that have routing entries.
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.portal_informations.keys().map(String::as_str)
    }

    /// Routing entries of `environment`, longest URL first.
    #[must_use]
    pub fn portal_informations(&self, environment: &str) -> Option<&[PortalInformation]> {
        self.portal_informations
            .get(environment)
            .map(Vec::as_slice)
    }

    /// Routing entries of `environment` restricted to the given match types.
    pub fn portal_informations_of_type<'a>(
        &'a self,
        environment: &str,
        types: &'a [MatchType],
    ) -> impl Iterator<Item = &'a PortalInformation> {
        self.portal_informations(environment)
            .unwrap_or_default()
            .iter()
            .filter(move |info| types.contains(&info.match_type()))
    }

    /// Routing entry keyed by `url` in `environment`.
    #[must_use]
    pub fn portal_information(&self, environment: &str, url: &str) -> Option<&PortalInformation> {
        self.portal_informations(environment)?
            .iter()
            .find(|info| info.url == url)
    }

    /// Files the collection was built from.
    #[must_use]
    pub fn resources(&self) -> &[FileResource] {
        &self.resources
    }

    /// Available templates of the builder that produced this collection, sorted.
    #[must_use]
    pub fn available_templates(&self) -> &[String] {
        &self.available_templates
    }
}
