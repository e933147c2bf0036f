//! Spindel: a same-site concurrent web crawler
//!
//! This crate crawls every page reachable from one seed URL on the same site.
//! Fetching and link extraction run in two worker pools connected by
//! unbounded frontier channels, with a shared visited set for deduplication
//! and an outstanding-work counter that decides when the crawl is finished.

pub mod config;
pub mod crawler;
pub mod logging;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Spindel operations
#[derive(Debug, Error)]
pub enum SpindelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Frontier queue error: {0}")]
    Queue(#[from] kanal::SendError),

    #[error("Crawl worker exited while work was outstanding: {0}")]
    WorkerExited(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {source}")]
    Parse {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Spindel operations
pub type Result<T> = std::result::Result<T, SpindelError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler};
pub use state::{CompletionTracker, CrawlState, VisitedSet};
pub use crate::url::{FilterPolicy, NormalizedUrl};
