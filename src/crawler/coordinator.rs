//! Crawler coordinator - main crawl orchestration logic
//!
//! This module wires the pipeline together:
//! - Seeding the visited set and the fetch queue with the root URL
//! - Spawning the fetch and parse worker pools
//! - Waiting for the outstanding-work counter to reach zero
//! - Closing the frontier queues and collecting the workers
//! - Producing the final [`CrawlReport`]

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetch_pool::FetchWorker;
use crate::crawler::fetcher::{Fetch, HttpFetcher, RetryPolicy};
use crate::crawler::frontier::{FetchQueue, ParseQueue, WorkItem};
use crate::crawler::parse_pool::ParseWorker;
use crate::output::{CrawlStats, StatsSnapshot};
use crate::state::{CompletionTracker, VisitedSet};
use crate::url::{
    normalize_url, site_base, FilterPolicy, LinkBase, NormalizedUrl, DEFAULT_ALLOWED_EXTENSIONS,
};
use crate::{ConfigError, Result, SpindelError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinSet};

/// Fixed parameters of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Seed URL; its host defines the site
    pub root: NormalizedUrl,
    pub fetch_workers: usize,
    pub parse_workers: usize,
    pub retry: RetryPolicy,
    pub link_base: LinkBase,
    pub allowed_extensions: Vec<String>,
}

impl CrawlSettings {
    /// Settings with default pool sizes, retry policy and filter
    pub fn new(root: NormalizedUrl) -> Self {
        Self {
            root,
            fetch_workers: 10,
            parse_workers: 10,
            retry: RetryPolicy::default(),
            link_base: LinkBase::default(),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            root: normalize_url(&config.seed)?,
            fetch_workers: config.fetch_workers,
            parse_workers: config.parse_workers,
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                base_delay: Duration::from_millis(config.retry_delay_ms),
                ..RetryPolicy::default()
            },
            link_base: config.link_base,
            allowed_extensions: config.allowed_extensions.clone(),
        })
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The crawl root, normalized
    pub root: String,
    /// Every URL marked visited, sorted
    pub visited: Vec<String>,
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
    /// True if the crawl was cancelled before it finished on its own
    pub cancelled: bool,
}

/// Main crawler structure
///
/// Owns the shared crawl state. [`Crawler::run`] consumes it, so each
/// instance performs exactly one crawl.
pub struct Crawler<F> {
    settings: CrawlSettings,
    fetcher: Arc<F>,
    policy: Arc<FilterPolicy>,
    visited: Arc<VisitedSet>,
    tracker: Arc<CompletionTracker>,
    stats: Arc<CrawlStats>,
}

impl Crawler<HttpFetcher> {
    /// Creates a crawler that fetches over HTTP as configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = CrawlSettings::from_config(&config.crawler)?;
        let fetcher = HttpFetcher::from_config(&config.http)?;
        Self::new(settings, fetcher)
    }
}

impl<F: Fetch> Crawler<F> {
    /// Creates a crawler over any [`Fetch`] implementation
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(SpindelError)` - A pool is empty or the root has no host
    pub fn new(settings: CrawlSettings, fetcher: F) -> Result<Self> {
        if settings.fetch_workers == 0 || settings.parse_workers == 0 {
            return Err(ConfigError::Validation(
                "both worker pools need at least one worker".to_string(),
            )
            .into());
        }

        let policy = FilterPolicy::with_extensions(&settings.root, &settings.allowed_extensions)?;

        Ok(Self {
            settings,
            fetcher: Arc::new(fetcher),
            policy: Arc::new(policy),
            visited: Arc::new(VisitedSet::new()),
            tracker: Arc::new(CompletionTracker::new()),
            stats: Arc::new(CrawlStats::new()),
        })
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Handle to the completion tracker, e.g. for cancelling from a signal
    pub fn tracker(&self) -> Arc<CompletionTracker> {
        Arc::clone(&self.tracker)
    }

    pub fn visited(&self) -> Arc<VisitedSet> {
        Arc::clone(&self.visited)
    }

    /// Runs the crawl to completion
    ///
    /// Returns once the outstanding-work counter has reached zero and every
    /// worker has exited. A worker that exits while work is still
    /// outstanding aborts the crawl with [`SpindelError::WorkerExited`].
    pub async fn run(self) -> Result<CrawlReport> {
        let start_time = Instant::now();
        let root = self.settings.root.clone();

        tracing::info!(
            "Starting crawl of {} ({} fetch workers, {} parse workers)",
            root,
            self.settings.fetch_workers,
            self.settings.parse_workers
        );

        let fetch_queue = FetchQueue::unbounded();
        let parse_queue = ParseQueue::unbounded();

        // The seed is already counted by the tracker.
        self.visited.check_and_mark(&root);
        fetch_queue.tx.send(WorkItem::new(root.clone())).await?;

        let mut workers = JoinSet::new();

        let fetch_worker = FetchWorker {
            fetcher: Arc::clone(&self.fetcher),
            retry: self.settings.retry,
            tracker: Arc::clone(&self.tracker),
            stats: Arc::clone(&self.stats),
        };
        for id in 0..self.settings.fetch_workers {
            workers.spawn(fetch_worker.clone().run(
                id,
                fetch_queue.rx.clone(),
                parse_queue.tx.clone(),
            ));
        }

        let parse_worker = ParseWorker {
            policy: Arc::clone(&self.policy),
            visited: Arc::clone(&self.visited),
            tracker: Arc::clone(&self.tracker),
            stats: Arc::clone(&self.stats),
            link_base: self.settings.link_base,
            root_base: Arc::new(site_base(root.as_url())),
        };
        for id in 0..self.settings.parse_workers {
            workers.spawn(parse_worker.clone().run(
                id,
                parse_queue.rx.clone(),
                fetch_queue.tx.clone(),
            ));
        }

        let early_exit = tokio::select! {
            _ = self.tracker.wait_until_drained() => None,
            Some(joined) = workers.join_next() => Some(describe_exit(joined)),
        };

        if early_exit.is_some() {
            // Stop accepting work so the remaining workers can be collected.
            self.tracker.cancel();
        } else {
            tracing::info!("No outstanding work left, closing queues");
        }

        fetch_queue.close();
        parse_queue.close();

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker failed during shutdown: {}", e);
            }
        }
        self.tracker.mark_terminated();

        if let Some(reason) = early_exit {
            tracing::error!("Crawl aborted: {}", reason);
            return Err(SpindelError::WorkerExited(reason));
        }

        let report = CrawlReport {
            root: root.to_string(),
            visited: self.visited.snapshot(),
            stats: self.stats.snapshot(),
            elapsed: start_time.elapsed(),
            cancelled: self.tracker.is_cancelled(),
        };

        tracing::info!(
            "Crawl completed: {} URLs visited in {:?}",
            report.visited.len(),
            report.elapsed
        );

        Ok(report)
    }
}

fn describe_exit(joined: std::result::Result<(), JoinError>) -> String {
    match joined {
        Ok(()) => "a worker returned while the queues were open".to_string(),
        Err(e) if e.is_panic() => format!("a worker panicked ({})", e),
        Err(e) => e.to_string(),
    }
}

/// Runs a complete crawl over HTTP
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
///
/// # Example
///
/// ```no_run
/// use spindel::config::load_config;
/// use spindel::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("spindel.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("visited {} URLs", report.visited.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport> {
    Crawler::from_config(config)?.run().await
}
