//! Parse stage of the crawl pipeline
//!
//! A parse worker extracts candidate links from one [`PageContent`], feeds
//! every accepted link back into the fetch queue, and only then completes the
//! work item the content belongs to.

use crate::crawler::frontier::{PageContent, WorkItem};
use crate::crawler::parser::extract_links;
use crate::output::CrawlStats;
use crate::state::{CompletionTracker, VisitedSet};
use crate::url::{FilterPolicy, LinkBase, NormalizedUrl};
use kanal::{AsyncReceiver, AsyncSender};
use std::sync::Arc;
use url::Url;

/// Shared state and settings of the parse pool
pub(crate) struct ParseWorker {
    pub policy: Arc<FilterPolicy>,
    pub visited: Arc<VisitedSet>,
    pub tracker: Arc<CompletionTracker>,
    pub stats: Arc<CrawlStats>,
    pub link_base: LinkBase,
    /// `scheme://host[:port]/` of the crawl root
    pub root_base: Arc<Url>,
}

impl Clone for ParseWorker {
    fn clone(&self) -> Self {
        Self {
            policy: Arc::clone(&self.policy),
            visited: Arc::clone(&self.visited),
            tracker: Arc::clone(&self.tracker),
            stats: Arc::clone(&self.stats),
            link_base: self.link_base,
            root_base: Arc::clone(&self.root_base),
        }
    }
}

/// What happened to one candidate link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkOutcome {
    Queued,
    Skipped,
}

impl ParseWorker {
    /// Runs until the parse queue is closed
    pub async fn run(
        self,
        id: usize,
        parse_rx: AsyncReceiver<PageContent>,
        fetch_tx: AsyncSender<WorkItem>,
    ) {
        tracing::debug!("Parse worker {} started", id);

        while let Ok(page) = parse_rx.recv().await {
            let queued = self.process_page(&page, &fetch_tx).await;
            tracing::debug!(
                "Parse worker {} finished {} ({} new links)",
                id,
                page.url,
                queued
            );
        }

        tracing::debug!("Parse worker {} done", id);
    }

    /// Processes every link on the page, then completes its work item
    ///
    /// Returns the number of links sent to the fetch queue.
    pub async fn process_page(
        &self,
        page: &PageContent,
        fetch_tx: &AsyncSender<WorkItem>,
    ) -> usize {
        let mut queued = 0;

        if !page.is_empty() {
            let links = extract_links(&page.body);
            self.stats.record_found(links.len());

            let base = self.link_base.base_for(&self.root_base, page.url.as_url());
            for raw in links {
                let outcome = self.process_link(raw, base, &page.url, fetch_tx).await;
                if outcome == LinkOutcome::Queued {
                    queued += 1;
                }
            }
        }

        self.stats.record_parsed();
        // Every link accepted above is already counted, so this can only reach
        // zero when nothing else is outstanding.
        self.tracker.complete();
        queued
    }

    async fn process_link(
        &self,
        raw: &str,
        base: &Url,
        found_on: &NormalizedUrl,
        fetch_tx: &AsyncSender<WorkItem>,
    ) -> LinkOutcome {
        let raw = raw.trim();
        if raw.is_empty() {
            return LinkOutcome::Skipped;
        }

        let url = match NormalizedUrl::resolve(raw, base) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Malformed link '{}' on {}: {}", raw, found_on, e);
                self.stats.record_malformed();
                return LinkOutcome::Skipped;
            }
        };

        if let Err(reason) = self.policy.evaluate(&url) {
            tracing::debug!("Skipping {}: {}", url, reason);
            self.stats.record_rejected();
            return LinkOutcome::Skipped;
        }

        if self.visited.check_and_mark(&url) {
            tracing::info!("Already visited {}", url);
            self.stats.record_duplicate();
            return LinkOutcome::Skipped;
        }

        if !self.tracker.register() {
            tracing::debug!("Crawl is stopping, not queueing {}", url);
            return LinkOutcome::Skipped;
        }

        if let Err(e) = fetch_tx.send(WorkItem::new(url)).await {
            tracing::error!("Fetch queue closed, dropping new link: {}", e);
            self.tracker.complete();
            return LinkOutcome::Skipped;
        }

        self.stats.record_queued();
        LinkOutcome::Queued
    }
}
