use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// An absolute URL in the canonical form used for equality and deduplication
///
/// Normalization is the WHATWG serialization produced by the `url` crate
/// (lowercased host, default port elided, dot segments removed, empty path
/// becomes `/`) with the fragment stripped, since a fragment names a position
/// inside a resource rather than a different resource.
///
/// Two `NormalizedUrl`s are equal exactly when their string forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Parses an absolute URL string
    pub fn parse(url_str: &str) -> UrlResult<Self> {
        let url = Url::parse(url_str.trim()).map_err(|source| UrlError::Parse {
            url: url_str.to_string(),
            source,
        })?;
        Ok(Self::from_url(url))
    }

    /// Resolves a raw link value against `base`
    ///
    /// A raw value that already carries a scheme replaces the base entirely;
    /// a scheme-relative value (`//host/path`) keeps only the base scheme;
    /// anything else is resolved as a path relative to `base`.
    ///
    /// # Examples
    ///
    /// ```
    /// use spindel::url::NormalizedUrl;
    /// use url::Url;
    ///
    /// let base = Url::parse("http://example.com/").unwrap();
    /// let url = NormalizedUrl::resolve("/a.html#top", &base).unwrap();
    /// assert_eq!(url.as_str(), "http://example.com/a.html");
    /// ```
    pub fn resolve(raw: &str, base: &Url) -> UrlResult<Self> {
        let url = base.join(raw.trim()).map_err(|source| UrlError::Parse {
            url: raw.to_string(),
            source,
        })?;
        Ok(Self::from_url(url))
    }

    fn from_url(mut url: Url) -> Self {
        url.set_fragment(None);
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Parses and normalizes a crawl root URL
///
/// Unlike [`NormalizedUrl::parse`], this rejects anything that cannot serve
/// as the root of a crawl: the scheme must be HTTP(S) and a host must be
/// present.
///
/// # Examples
///
/// ```
/// use spindel::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.COM").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/");
/// assert!(normalize_url("ftp://example.com/").is_err());
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<NormalizedUrl> {
    let url = NormalizedUrl::parse(url_str)?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.as_url().host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url_str.to_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Url {
        Url::parse("http://example.com/").unwrap()
    }

    #[test]
    fn test_resolve_absolute_path() {
        let url = NormalizedUrl::resolve("/a.html", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/a.html");
    }

    #[test]
    fn test_resolve_keeps_foreign_scheme_and_host() {
        let url = NormalizedUrl::resolve("https://other.com/x", &root()).unwrap();
        assert_eq!(url.as_str(), "https://other.com/x");
    }

    #[test]
    fn test_resolve_scheme_relative() {
        let url = NormalizedUrl::resolve("//other.com/x", &root()).unwrap();
        assert_eq!(url.as_str(), "http://other.com/x");
    }

    #[test]
    fn test_resolve_path_relative_against_page() {
        let page = Url::parse("http://example.com/docs/guide/intro.html").unwrap();
        let url = NormalizedUrl::resolve("../faq.html", &page).unwrap();
        assert_eq!(url.as_str(), "http://example.com/docs/faq.html");
    }

    #[test]
    fn test_resolve_path_relative_against_root() {
        let url = NormalizedUrl::resolve("../faq.html", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/faq.html");
    }

    #[test]
    fn test_fragment_removed() {
        let url = NormalizedUrl::resolve("/page#section", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/page");

        let same_page = NormalizedUrl::resolve("#top", &root()).unwrap();
        assert_eq!(same_page.as_str(), "http://example.com/");
    }

    #[test]
    fn test_query_preserved() {
        let url = NormalizedUrl::resolve("/search?q=rust&page=2", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/search?q=rust&page=2");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let url = NormalizedUrl::resolve("  /a.html\n", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/a.html");
    }

    #[test]
    fn test_resolve_malformed() {
        let result = NormalizedUrl::resolve("http://[::1", &root());
        assert!(matches!(result, Err(UrlError::Parse { .. })));
    }

    #[test]
    fn test_equality_is_string_equality() {
        let a = NormalizedUrl::parse("HTTP://EXAMPLE.com:80/a/./b").unwrap();
        let b = NormalizedUrl::parse("http://example.com/a/b").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_normalize_url_empty_path_becomes_root() {
        let url = normalize_url("https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_normalize_url_invalid_scheme() {
        let result = normalize_url("ftp://example.com/page");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_normalize_url_relative_rejected() {
        assert!(normalize_url("/just/a/path").is_err());
        assert!(normalize_url("not a url").is_err());
    }
}
