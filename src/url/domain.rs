use std::fmt;
use url::Url;

/// Host and explicit port that together identify a site
///
/// The port is only kept when it is not the scheme's default, so
/// `http://example.com/`, `http://example.com:80/` and `https://example.com/`
/// name the same site while `http://example.com:8080/` does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteAuthority {
    host: String,
    port: Option<u16>,
}

impl SiteAuthority {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl fmt::Display for SiteAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

/// Extracts the site authority from a URL
///
/// Returns `None` when the URL has no host (e.g. `mailto:` links).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use spindel::url::extract_authority;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// let authority = extract_authority(&url).unwrap();
/// assert_eq!(authority.host(), "example.com");
/// assert_eq!(authority.port(), None);
/// ```
pub fn extract_authority(url: &Url) -> Option<SiteAuthority> {
    url.host_str()
        .filter(|host| !host.is_empty())
        .map(|host| SiteAuthority {
            host: host.to_lowercase(),
            port: url.port(),
        })
}

/// Returns the bare `scheme://host[:port]/` form of a URL
///
/// This is the base that root-relative link resolution joins against.
pub fn site_base(url: &Url) -> Url {
    let mut base = url.clone();
    base.set_path("/");
    base.set_query(None);
    base.set_fragment(None);
    base
}
