//! Output module for crawl results
//!
//! This module provides the statistics collected during a crawl and the
//! summary printed when it finishes.

mod stats;

pub use stats::{CrawlStats, StatsSnapshot};

use crate::crawler::CrawlReport;

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report returned by a finished crawl
/// * `list_urls` - Whether to print every visited URL
pub fn print_report(report: &CrawlReport, list_urls: bool) {
    let stats = &report.stats;

    println!("=== Crawl Summary ===\n");

    println!("Root: {}", report.root);
    if report.cancelled {
        println!("Status: cancelled (partial results)");
    } else {
        println!("Status: complete");
    }
    println!("Elapsed: {:.2?}", report.elapsed);
    println!();

    println!("Fetching:");
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!(
        "  Failed fetches: {} ({:.1}% success)",
        stats.fetch_failures,
        stats.success_rate()
    );
    println!("  Attempts (incl. retries): {}", stats.fetch_attempts);
    println!();

    println!("Links:");
    println!("  Found: {}", stats.links_found);
    println!("  Queued: {}", stats.links_queued);
    println!("  Out of scope: {}", stats.links_rejected);
    println!("  Already visited: {}", stats.links_duplicate);
    println!("  Malformed: {}", stats.links_malformed);
    println!();

    println!("Visited URLs: {}", report.visited.len());
    if list_urls {
        for url in &report.visited {
            println!("  {}", url);
        }
    }
}
