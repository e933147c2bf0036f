use crate::url::NormalizedUrl;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Set of normalized URLs that have already been claimed by the crawl
///
/// Membership test and insertion happen under one lock acquisition, so two
/// workers racing on the same URL can never both observe "not visited".
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited and reports whether it already was
    ///
    /// Returns `false` the first time a URL is seen and `true` on every later
    /// call.
    pub fn check_and_mark(&self, url: &NormalizedUrl) -> bool {
        !self.lock().insert(url.as_str().to_owned())
    }

    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        self.lock().contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns every marked URL in sorted order
    pub fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock().iter().cloned().collect();
        urls.sort();
        urls
    }

    // A panic while holding the lock cannot leave the set half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
