//! Global completion detection for the crawl
//!
//! The tracker counts work items that have been created but not yet fully
//! processed. The seed URL is the first item, so the count starts at one.
//! A parse worker registers every link it accepts *before* completing the
//! page that produced it, which means the count can only reach zero once the
//! whole reachable graph has been fetched and parsed.

use crate::state::CrawlState;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::watch;

/// Outstanding-work counter plus the crawl's observable lifecycle
#[derive(Debug)]
pub struct CompletionTracker {
    outstanding: AtomicUsize,
    cancelled: AtomicBool,
    state: watch::Sender<CrawlState>,
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionTracker {
    /// Creates a tracker with the seed already counted
    pub fn new() -> Self {
        let (state, _) = watch::channel(CrawlState::Running);
        Self {
            outstanding: AtomicUsize::new(1),
            cancelled: AtomicBool::new(false),
            state,
        }
    }

    /// Counts one newly created work item
    ///
    /// Returns `false` without counting when the crawl has been cancelled or
    /// the counter already reached zero. Callers must not enqueue the item
    /// in that case.
    pub fn register(&self) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return false;
        }

        self.outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                if n == 0 {
                    None
                } else {
                    Some(n + 1)
                }
            })
            .is_ok()
    }

    /// Marks one work item as fully processed
    ///
    /// The call that brings the counter to zero moves the crawl to
    /// [`CrawlState::Draining`].
    pub fn complete(&self) {
        match self
            .outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        {
            Ok(1) => {
                tracing::debug!("Outstanding work reached zero");
                self.advance(CrawlState::Draining);
            }
            Ok(_) => {}
            Err(_) => {
                tracing::error!("Work item completed with no outstanding work; ignoring");
            }
        }
    }

    /// Records that every worker has exited
    pub fn mark_terminated(&self) {
        self.advance(CrawlState::Terminated);
    }

    /// Stops the crawl from accepting new work items
    ///
    /// Items already in flight still drain normally.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            tracing::info!("Crawl cancelled; draining in-flight work");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Current number of outstanding work items
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> CrawlState {
        *self.state.borrow()
    }

    /// Subscribes to lifecycle transitions
    pub fn subscribe(&self) -> watch::Receiver<CrawlState> {
        self.state.subscribe()
    }

    /// Waits until the crawl leaves [`CrawlState::Running`]
    pub async fn wait_until_drained(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|state| state.is_finishing()).await;
    }

    /// Moves the state forward; backward transitions are ignored
    fn advance(&self, next: CrawlState) {
        let advanced = self.state.send_if_modified(|current| {
            if *current < next {
                *current = next;
                true
            } else {
                false
            }
        });

        if advanced {
            tracing::info!("Crawl state: {}", next);
        }
    }
}
