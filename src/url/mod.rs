//! URL handling module for Spindel
//!
//! This module provides URL normalization and resolution, site identity,
//! and the filter policy that keeps the crawl on one site.

mod domain;
mod filter;
mod normalize;

use serde::Deserialize;
use url::Url;

// Re-export main types and functions
pub use domain::{extract_authority, site_base, SiteAuthority};
pub use filter::{FilterPolicy, Rejection, DEFAULT_ALLOWED_EXTENSIONS};
pub use normalize::{normalize_url, NormalizedUrl};

/// Base that relative links are resolved against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinkBase {
    /// Resolve against the crawl root's scheme and host, as if every link
    /// had been found on `/`
    #[default]
    Root,
    /// Resolve against the URL of the page that contained the link
    Page,
}

impl LinkBase {
    /// Picks the URL a relative link found on `page` is joined against
    pub fn base_for<'a>(&self, root_base: &'a Url, page: &'a Url) -> &'a Url {
        match self {
            Self::Root => root_base,
            Self::Page => page,
        }
    }
}
