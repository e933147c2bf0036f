//! Crawl statistics
//!
//! Workers bump the counters in [`CrawlStats`] as they go; the coordinator
//! takes a [`StatsSnapshot`] once the crawl has terminated.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated concurrently by the worker pools
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    fetch_attempts: AtomicU64,
    pages_parsed: AtomicU64,
    links_found: AtomicU64,
    links_queued: AtomicU64,
    links_rejected: AtomicU64,
    links_duplicate: AtomicU64,
    links_malformed: AtomicU64,
}

/// Point-in-time copy of [`CrawlStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Fetches that produced a 2xx body
    pub pages_fetched: u64,
    /// Fetches that ended with empty content (status, body or transport failure)
    pub fetch_failures: u64,
    /// Every transport attempt, including retries
    pub fetch_attempts: u64,
    /// Content items whose links were fully processed
    pub pages_parsed: u64,
    /// Candidate links extracted from markup
    pub links_found: u64,
    /// Links accepted and sent to the fetch queue
    pub links_queued: u64,
    /// Links rejected by the filter policy
    pub links_rejected: u64,
    /// Links dropped because they were already visited
    pub links_duplicate: u64,
    /// Links that could not be resolved to a URL
    pub links_malformed: u64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self, attempts: u32, success: bool) {
        self.fetch_attempts
            .fetch_add(u64::from(attempts), Ordering::Relaxed);
        if success {
            self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        } else {
            self.fetch_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_parsed(&self) {
        self.pages_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_found(&self, count: usize) {
        self.links_found.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_queued(&self) {
        self.links_queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.links_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.links_duplicate.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.links_malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            fetch_attempts: self.fetch_attempts.load(Ordering::Relaxed),
            pages_parsed: self.pages_parsed.load(Ordering::Relaxed),
            links_found: self.links_found.load(Ordering::Relaxed),
            links_queued: self.links_queued.load(Ordering::Relaxed),
            links_rejected: self.links_rejected.load(Ordering::Relaxed),
            links_duplicate: self.links_duplicate.load(Ordering::Relaxed),
            links_malformed: self.links_malformed.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Fetches that completed, successfully or not
    pub fn total_fetches(&self) -> u64 {
        self.pages_fetched + self.fetch_failures
    }

    /// Share of fetches that produced content, in percent
    pub fn success_rate(&self) -> f64 {
        let total = self.total_fetches();
        if total == 0 {
            0.0
        } else {
            (self.pages_fetched as f64 / total as f64) * 100.0
        }
    }
}
