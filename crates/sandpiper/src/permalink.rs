use std::fmt;

use url::Url;

use crate::SiteConfig;

/// An absolute URL to a route on the site.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Permalink(Url);

impl Permalink {
    /// Returns the permalink for the given route path.
    ///
    /// Paths without a file extension get a trailing slash.
    pub fn from_path(config: &SiteConfig, path: &str) -> Result<Self, url::ParseError> {
        let path = path.trim_start_matches('/');
        let is_file = path
            .rsplit('/')
            .next()
            .is_some_and(|segment| segment.contains('.'));

        let suffix = if path.ends_with('/') || path.is_empty() || is_file {
            ""
        } else {
            "/"
        };
        let base_url = config.base_url.trim_end_matches('/');

        Ok(Self(Url::parse(&format!("{base_url}/{path}{suffix}"))?))
    }

    /// Resolves a site-relative URL (e.g., `/assets/cover.jpg`) against the
    /// base URL. Other URLs are returned as-is.
    pub fn resolve_url(config: &SiteConfig, url: &str) -> Result<String, url::ParseError> {
        if url.starts_with('/') {
            Ok(Self::from_path(config, url)?.to_string())
        } else {
            Ok(url.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }
}

impl fmt::Display for Permalink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_config(base_url: &str) -> SiteConfig {
        SiteConfig::default().with_base_url(base_url)
    }

    #[test]
    fn test_permalink() {
        for (base_url, path) in [
            ("https://example.com/", "/"),
            ("https://example.com", "/"),
            ("https://example.com", ""),
        ] {
            assert_eq!(
                Permalink::from_path(&make_config(base_url), path)
                    .unwrap()
                    .as_str(),
                "https://example.com/"
            );
        }
    }

    #[test]
    fn test_permalink_for_routes_and_files() {
        let config = make_config("https://example.com");

        assert_eq!(
            Permalink::from_path(&config, "/posts/hello-world")
                .unwrap()
                .as_str(),
            "https://example.com/posts/hello-world/"
        );
        assert_eq!(
            Permalink::from_path(&config, "/category/daily/")
                .unwrap()
                .as_str(),
            "https://example.com/category/daily/"
        );
        assert_eq!(
            Permalink::from_path(&config, "/rss.xml").unwrap().as_str(),
            "https://example.com/rss.xml"
        );
    }

    #[test]
    fn test_resolve_url() {
        let config = make_config("https://example.com/blog");

        assert_eq!(
            Permalink::resolve_url(&config, "/assets/cover.jpg").unwrap(),
            "https://example.com/blog/assets/cover.jpg"
        );
        assert_eq!(
            Permalink::resolve_url(&config, "https://cdn.example.com/a.png").unwrap(),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_permalink_under_base_path() {
        let config = make_config("https://example.com/blog/");

        let permalink = Permalink::from_path(&config, "/posts/hello").unwrap();

        assert_eq!(permalink.as_str(), "https://example.com/blog/posts/hello/");
        assert_eq!(permalink.path(), "/blog/posts/hello/");
    }
}
