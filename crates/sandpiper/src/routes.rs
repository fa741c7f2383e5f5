//! The route paths that make up a built site.

pub const INDEX: &str = "/";
pub const SEARCH: &str = "/search/";
pub const FEED: &str = "/rss.xml";
pub const SITEMAP: &str = "/sitemap.xml";
pub const SEARCH_INDEX: &str = "/search-index.json";
pub const CATEGORIES: &str = "/categories.json";

pub fn post(slug: &str) -> String {
    format!("/posts/{slug}/")
}

pub fn page(slug: &str) -> String {
    format!("/page-info/{slug}/")
}

pub fn category(slug: &str) -> String {
    format!("/category/{slug}/")
}
