//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Link extraction from raw markup
//! - The frontier queues and the two worker pools they connect
//! - Overall crawl coordination and completion

mod coordinator;
mod fetch_pool;
mod fetcher;
mod frontier;
mod parse_pool;
mod parser;

pub use coordinator::{run_crawl, CrawlReport, CrawlSettings, Crawler};
pub use fetcher::{
    build_http_client, fetch_page, Fetch, FetchError, FetchResponse, HttpFetcher, RetryPolicy,
};
pub use frontier::{FetchQueue, PageContent, ParseQueue, Queue, WorkItem};
pub use parser::extract_links;
