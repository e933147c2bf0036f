//! Fetch stage of the crawl pipeline
//!
//! Each worker takes a [`WorkItem`] off the fetch queue, retrieves it, and
//! hands exactly one [`PageContent`] to the parse queue, empty when the fetch
//! failed. The parse stage then completes the work item.

use crate::crawler::fetcher::{fetch_page, Fetch, RetryPolicy};
use crate::crawler::frontier::{PageContent, WorkItem};
use crate::output::CrawlStats;
use crate::state::CompletionTracker;
use kanal::{AsyncReceiver, AsyncSender};
use std::sync::Arc;

/// Everything a fetch worker needs, shared across the pool
pub(crate) struct FetchWorker<F> {
    pub fetcher: Arc<F>,
    pub retry: RetryPolicy,
    pub tracker: Arc<CompletionTracker>,
    pub stats: Arc<CrawlStats>,
}

impl<F> Clone for FetchWorker<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            retry: self.retry,
            tracker: Arc::clone(&self.tracker),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<F: Fetch> FetchWorker<F> {
    /// Runs until the fetch queue is closed
    pub async fn run(
        self,
        id: usize,
        fetch_rx: AsyncReceiver<WorkItem>,
        parse_tx: AsyncSender<PageContent>,
    ) {
        tracing::debug!("Fetch worker {} started", id);

        while let Ok(item) = fetch_rx.recv().await {
            tracing::debug!("Fetch worker {} is working on {}", id, item.url);

            let content = fetch_page(self.fetcher.as_ref(), item.url, &self.retry).await;
            self.stats.record_fetch(content.attempts, content.is_success());

            let url = content.url.clone();
            if let Err(e) = parse_tx.send(content).await {
                // Nobody will parse this item, so finish it here.
                tracing::warn!("Parse queue closed, dropping content of {}: {}", url, e);
                self.tracker.complete();
            }
        }

        tracing::debug!("Fetch worker {} done", id);
    }
}
