//! Webspace configuration model and portal information builder.
//!
//! A webspace describes a site: its portals, the localizations each portal
//! serves and, per deployment environment, the URL templates it answers to.
//! [`WebspaceCollectionBuilder`] turns a set of webspaces into a
//! [`WebspaceCollection`] holding, for every environment, the routing table
//! a request matcher walks: URL key to [`PortalInformation`], longest key
//! first.
//!
//! # Architecture
//!
//! - [`replacer`]: placeholder substitution in URL templates
//! - [`Webspace`], [`Portal`], [`Environment`], [`Url`], [`CustomUrl`], [`Localization`]: configuration model
//! - [`WebspaceCollectionBuilder`]: builds the routing tables
//! - [`WebspaceSource`]: where configuration comes from (see `sulu-webspace-fs`)
//! - [`WebspaceManager`]: cached, shared access to the current collection
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use sulu_webspace::{
//!     Environment, FileResource, LoadedWebspace, Localization, MatchType, Portal, Url,
//!     Webspace, WebspaceCollectionBuilder,
//! };
//!
//! let portal = Portal {
//!     key: "acme".to_owned(),
//!     name: "ACME".to_owned(),
//!     localizations: vec![Localization::new("en", None), Localization::new("de", None)],
//!     environments: vec![Environment {
//!         name: "prod".to_owned(),
//!         urls: vec![Url::new("{language}.acme.com")],
//!         custom_urls: Vec::new(),
//!     }],
//! };
//! let webspace = Webspace {
//!     key: "acme".to_owned(),
//!     name: "ACME".to_owned(),
//!     localizations: Vec::new(),
//!     default_templates: Default::default(),
//!     excluded_templates: Vec::new(),
//!     theme: None,
//!     portals: vec![portal],
//! };
//! let loaded = LoadedWebspace {
//!     webspace,
//!     resource: FileResource { path: PathBuf::from("acme.toml"), fingerprint: String::new() },
//! };
//!
//! let collection = WebspaceCollectionBuilder::default().build([loaded]).unwrap();
//! let partial = collection.portal_information("prod", "acme.com").unwrap();
//! assert_eq!(partial.match_type(), MatchType::Partial);
//! ```

mod builder;
mod cache;
mod collection;
mod error;
mod localization;
mod manager;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod portal;
mod portal_information;
pub mod replacer;
mod source;
mod webspace;

pub use builder::WebspaceCollectionBuilder;
pub use cache::{CollectionCache, FileCollectionCache, NullCollectionCache};
pub use collection::WebspaceCollection;
pub use error::{BuildError, ManagerError, SourceError};
pub use localization::{DASH, Localization, UNDERSCORE};
pub use manager::WebspaceManager;
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use portal::{CustomUrl, Environment, Portal, Url};
pub use portal_information::{Match, MatchType, PortalInformation};
pub use replacer::Placeholder;
pub use source::WebspaceSource;
pub use webspace::{FileResource, LoadedWebspace, Webspace};
