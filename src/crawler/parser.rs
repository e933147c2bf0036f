//! Link extraction from raw markup
//!
//! Links are found by pattern matching `href="…"` over the page text rather
//! than by building a DOM. The pattern is case-insensitive, takes the
//! shortest quoted value, and may span lines. Attributes inside scripts,
//! comments or malformed markup match too; those candidates are filtered
//! later like any other link.

use once_cell::sync::Lazy;
use regex::Regex;

static HREF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)href="(.*?)""#).expect("href pattern is valid"));

/// Extracts every raw `href` value from the markup, in document order
///
/// Values are returned exactly as written (not trimmed or resolved).
/// Duplicates are kept; deduplication happens against the visited set.
///
/// # Example
///
/// ```
/// use spindel::crawler::extract_links;
///
/// let html = r#"<a href="/a.html">A</a> <A HREF="http://other.com/x">X</A>"#;
/// assert_eq!(extract_links(html), vec!["/a.html", "http://other.com/x"]);
/// ```
pub fn extract_links(content: &str) -> Vec<&str> {
    HREF_PATTERN
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}
