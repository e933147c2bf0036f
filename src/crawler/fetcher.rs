//! HTTP fetcher implementation
//!
//! This module handles retrieval of page content for the crawler, including:
//! - The [`Fetch`] seam the fetch pool retrieves pages through
//! - An HTTP implementation of it over `reqwest`
//! - Retry with exponential backoff for transient transport failures
//! - Error classification into content / empty content

use crate::config::HttpConfig;
use crate::crawler::frontier::PageContent;
use crate::url::NormalizedUrl;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Response received from a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body; only read for 2xx responses
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures a fetch can report
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure; worth retrying
    #[error("transport error: {0}")]
    Transport(String),

    /// The request can never succeed as sent (redirect loop or limit,
    /// unbuildable request)
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The status arrived but the body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl FetchError {
    /// Returns true if another attempt might succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Capability to retrieve the content behind a URL
///
/// Non-2xx responses are not errors at this level: implementations return
/// them as a [`FetchResponse`] and leave the decision to the caller.
pub trait Fetch: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// [`Fetch`] implementation backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client configured from `config`
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        build_http_client(config).map(Self::new)
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(FetchResponse {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn classify_send_error(e: &reqwest::Error) -> FetchError {
    if e.is_redirect() {
        FetchError::Rejected(format!("redirect failed ({})", e))
    } else if e.is_builder() {
        FetchError::Rejected(format!("invalid request ({})", e))
    } else if e.is_timeout() {
        FetchError::Transport(format!("request timeout ({})", e))
    } else if e.is_connect() {
        FetchError::Transport(format!("connection failed ({})", e))
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Example
///
/// ```no_run
/// use spindel::config::HttpConfig;
/// use spindel::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retry schedule for transient fetch failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on every further retry
    pub base_delay: Duration,
    /// Upper bound on the delay between attempts
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Fetches a URL, retrying transient failures
///
/// # Outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx response | body |
/// | non-2xx response | empty, logged as error, not retried |
/// | body read failure | empty, logged as error, not retried |
/// | redirect loop or limit | empty, logged as error, not retried |
/// | transport failure | warning, retried up to `max_attempts` |
/// | every attempt failed | empty, logged as error |
///
/// Every attempt is logged at info level.
pub async fn fetch_page<F: Fetch>(
    fetcher: &F,
    url: NormalizedUrl,
    retry: &RetryPolicy,
) -> PageContent {
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        tracing::info!("Visiting {} (attempt {}/{})", url, attempt, max_attempts);

        match fetcher.fetch(url.as_url()).await {
            Ok(response) if response.is_success() => {
                return PageContent {
                    url,
                    body: response.body,
                    status: Some(response.status),
                    attempts: attempt,
                };
            }
            Ok(response) => {
                tracing::error!("Could not get page {} (HTTP {})", url, response.status);
                return PageContent::empty(url, Some(response.status), attempt);
            }
            Err(e) if !e.is_transient() => {
                tracing::error!("Could not get page {}: {}", url, e);
                return PageContent::empty(url, None, attempt);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!("Giving up on {} after {} attempts: {}", url, attempt, e);
                return PageContent::empty(url, None, attempt);
            }
            Err(e) => {
                tracing::warn!("Attempt {}/{} for {} failed: {}", attempt, max_attempts, url, e);
                tokio::time::sleep(retry.delay_after(attempt)).await;
            }
        }
    }
}
