use std::fmt;
use url::{Origin, Url};

/// Absolute URL of the page being saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    url: Url,
    origin_base: Url,
}

impl SourceUrl {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(raw)?))
    }

    pub fn new(url: Url) -> Self {
        let mut origin_base = url.clone();
        origin_base.set_path("/");
        origin_base.set_query(None);
        origin_base.set_fragment(None);

        Self { url, origin_base }
    }

    /// Scheme, host and port
    pub fn origin(&self) -> Origin {
        self.url.origin()
    }

    /// Host name, empty for host-less URLs
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolve a reference found in the page against the page origin.
    ///
    /// Relative references resolve from the site root, not from the page's
    /// own directory.
    pub fn resolve(&self, reference: &str) -> Result<Url, url::ParseError> {
        self.origin_base.join(reference)
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
