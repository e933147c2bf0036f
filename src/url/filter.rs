use crate::url::domain::{extract_authority, SiteAuthority};
use crate::url::NormalizedUrl;
use crate::{UrlError, UrlResult};
use std::fmt;

/// Path extensions followed when no allowlist is configured
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["html", "css", "js", "php"];

/// Reason a discovered URL was judged out of scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Scheme is neither `http` nor `https`
    Scheme(String),
    /// Host (or explicit port) differs from the crawl root
    ForeignHost(String),
    /// Path carries an extension outside the allowlist
    Extension(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheme(scheme) => write!(f, "not http or https ({})", scheme),
            Self::ForeignHost(host) => write!(f, "host {} is outside the crawl root", host),
            Self::Extension(ext) => write!(f, "extension '{}' is not allowed", ext),
        }
    }
}

/// Decides whether a discovered URL is in scope for the crawl
///
/// The policy is pure: it never touches the visited set, so the same URL can
/// be evaluated any number of times with the same answer. Checks run in this
/// order and the first failure wins:
///
/// 1. Scheme is `http` or `https`
/// 2. Host and explicit port equal the crawl root's
/// 3. If the path contains a `.`, the text after the last `.` matches the
///    extension allowlist case-insensitively
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    root: SiteAuthority,
    allowed_extensions: Vec<String>,
}

impl FilterPolicy {
    /// Creates a policy for the given crawl root with the default allowlist
    pub fn new(root: &NormalizedUrl) -> UrlResult<Self> {
        Self::with_extensions(root, DEFAULT_ALLOWED_EXTENSIONS.iter().copied())
    }

    /// Creates a policy for the given crawl root with a custom allowlist
    pub fn with_extensions<I, S>(root: &NormalizedUrl, extensions: I) -> UrlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = extract_authority(root.as_url())
            .ok_or_else(|| UrlError::MissingHost(root.to_string()))?;

        let allowed_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();

        Ok(Self {
            root,
            allowed_extensions,
        })
    }

    /// The site every followed URL must belong to
    pub fn root(&self) -> &SiteAuthority {
        &self.root
    }

    /// Evaluates a URL, returning the reason when it is rejected
    pub fn evaluate(&self, url: &NormalizedUrl) -> Result<(), Rejection> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(Rejection::Scheme(scheme.to_string()));
        }

        match extract_authority(url.as_url()) {
            Some(authority) if authority == self.root => {}
            Some(authority) => return Err(Rejection::ForeignHost(authority.to_string())),
            None => return Err(Rejection::ForeignHost(String::new())),
        }

        if let Some(ext) = path_extension(url.path()) {
            if !self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            {
                return Err(Rejection::Extension(ext.to_string()));
            }
        }

        Ok(())
    }

    /// Returns true if the URL should be fetched
    ///
    /// # Examples
    ///
    /// ```
    /// use spindel::url::{normalize_url, FilterPolicy};
    ///
    /// let root = normalize_url("http://example.com/").unwrap();
    /// let policy = FilterPolicy::new(&root).unwrap();
    ///
    /// assert!(policy.should_visit(&normalize_url("http://example.com/page.html").unwrap()));
    /// assert!(policy.should_visit(&normalize_url("http://example.com/section/").unwrap()));
    /// assert!(!policy.should_visit(&normalize_url("http://example.com/image.png").unwrap()));
    /// assert!(!policy.should_visit(&normalize_url("http://other.com/page.html").unwrap()));
    /// ```
    pub fn should_visit(&self, url: &NormalizedUrl) -> bool {
        self.evaluate(url).is_ok()
    }
}

/// Text after the last `.` of a path, or `None` when the path has no `.`
fn path_extension(path: &str) -> Option<&str> {
    path.rfind('.').map(|idx| &path[idx + 1..])
}
