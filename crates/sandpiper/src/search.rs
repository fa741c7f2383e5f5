use serde::Serialize;

use crate::content::Post;
use crate::date::to_w3c;

/// Returns the posts whose title or excerpt contains `query`, ignoring case.
///
/// An empty query matches nothing. The order of `posts` is preserved.
pub fn search_posts<'p>(query: &str, posts: &'p [Post]) -> Vec<&'p Post> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    posts
        .iter()
        .filter(|post| {
            let haystack = format!("{}{}", post.meta.title, post.meta.excerpt).to_lowercase();
            haystack.contains(&query)
        })
        .collect()
}

/// An entry in the search index published alongside a built site.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SearchEntry<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub excerpt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

pub fn search_index(posts: &[Post]) -> Vec<SearchEntry<'_>> {
    posts
        .iter()
        .map(|post| SearchEntry {
            slug: &post.slug,
            title: &post.meta.title,
            excerpt: &post.meta.excerpt,
            date: post.date.as_ref().map(to_w3c),
        })
        .collect()
}
