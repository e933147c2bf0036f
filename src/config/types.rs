use crate::logging::LogLevel;
use crate::url::{LinkBase, DEFAULT_ALLOWED_EXTENSIONS};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Spindel
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Builds a configuration with every setting at its default
    ///
    /// # Example
    ///
    /// ```
    /// use spindel::config::Config;
    ///
    /// let config = Config::for_seed("http://example.com/");
    /// assert_eq!(config.crawler.fetch_workers, 10);
    /// ```
    pub fn for_seed(seed: &str) -> Self {
        Self {
            crawler: CrawlerConfig::for_seed(seed),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute URL the crawl starts from; its host defines the site
    pub seed: String,

    /// Number of concurrent fetch workers
    #[serde(rename = "fetch-workers", default = "default_workers")]
    pub fetch_workers: usize,

    /// Number of concurrent parse workers
    #[serde(rename = "parse-workers", default = "default_workers")]
    pub parse_workers: usize,

    /// Attempts per URL before giving up on transport failures
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds); doubles per retry
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// What relative links are resolved against
    #[serde(rename = "link-base", default)]
    pub link_base: LinkBase,

    /// Path extensions that may be followed
    #[serde(rename = "allowed-extensions", default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl CrawlerConfig {
    pub fn for_seed(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            fetch_workers: default_workers(),
            parse_workers: default_workers(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            link_base: LinkBase::default(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Redirects followed before a request fails
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Minimum severity that is written
    #[serde(default)]
    pub level: LogLevel,

    /// File that log entries are appended to, in addition to stderr
    pub file: Option<PathBuf>,
}

fn default_workers() -> usize {
    10
}

fn default_max_attempts() -> u32 {
    10
}

fn default_retry_delay_ms() -> u64 {
    100
}

fn default_allowed_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_user_agent() -> String {
    format!("spindel/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}
