//! Frontier channels connecting the worker pools
//!
//! Both queues are unbounded multi-producer multi-consumer channels. A send
//! never waits for a receiver, so fetch workers feeding the parse queue and
//! parse workers feeding the fetch queue can never block on each other.
//! Every URL enters the fetch queue at most once (the visited set guarantees
//! it), which bounds the queues by the size of the site.

use crate::url::NormalizedUrl;
use kanal::{AsyncReceiver, AsyncSender};

/// A URL waiting to be fetched
#[derive(Debug)]
pub struct WorkItem {
    pub url: NormalizedUrl,
}

impl WorkItem {
    pub fn new(url: NormalizedUrl) -> Self {
        Self { url }
    }
}

/// The fetched body of a work item, on its way to a parse worker
///
/// A failed fetch still produces a `PageContent` with an empty body, so every
/// work item reaches the parse stage exactly once.
#[derive(Debug)]
pub struct PageContent {
    /// URL the content was fetched from
    pub url: NormalizedUrl,
    /// Raw response body; empty when the fetch failed
    pub body: String,
    /// HTTP status of the last response, if one was received
    pub status: Option<u16>,
    /// Transport attempts the fetch used
    pub attempts: u32,
}

impl PageContent {
    /// Content for a fetch that produced nothing to parse
    pub fn empty(url: NormalizedUrl, status: Option<u16>, attempts: u32) -> Self {
        Self {
            url,
            body: String::new(),
            status,
            attempts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns true if the fetch ended with a 2xx response
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }
}

/// Both ends of one frontier queue
pub struct Queue<T> {
    pub tx: AsyncSender<T>,
    pub rx: AsyncReceiver<T>,
}

impl<T> Queue<T> {
    pub fn unbounded() -> Self {
        let (tx, rx) = kanal::unbounded_async();
        Self { tx, rx }
    }

    /// Closes the queue for every sender and receiver
    ///
    /// Receivers blocked in `recv` wake up with an error and exit their loop.
    pub fn close(&self) {
        // Closing an already-closed channel is a no-op.
        let _ = self.tx.close();
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Queue of URLs awaiting fetch
pub type FetchQueue = Queue<WorkItem>;

/// Queue of content awaiting parse
pub type ParseQueue = Queue<PageContent>;
