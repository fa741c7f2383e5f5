use chrono::{DateTime, FixedOffset};

use crate::content::{Page, Post};
use crate::date::to_w3c;
use crate::html::HtmlElement;
use crate::permalink::Permalink;
use crate::render::RenderError;
use crate::taxonomy::{posts_by_category, Taxonomy};
use crate::{routes, SiteConfig};

#[derive(Debug, PartialEq, Clone)]
pub struct SitemapEntry {
    pub permalink: Permalink,
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub priority: &'static str,
}

/// Collects the sitemap entries for the site.
///
/// Categories are only listed when they or one of their subcategories have
/// posts.
pub fn sitemap_entries(
    config: &SiteConfig,
    taxonomy: &Taxonomy,
    posts: &[Post],
    pages: &[Page],
) -> Result<Vec<SitemapEntry>, url::ParseError> {
    fn newest<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Option<DateTime<FixedOffset>> {
        posts.into_iter().filter_map(|post| post.date).max()
    }

    let mut entries = vec![SitemapEntry {
        permalink: Permalink::from_path(config, routes::INDEX)?,
        updated_at: newest(posts),
        priority: "1.0",
    }];

    for page in pages {
        entries.push(SitemapEntry {
            permalink: Permalink::from_path(config, &routes::page(&page.slug))?,
            updated_at: page.date,
            priority: "0.8",
        });
    }

    for post in posts {
        entries.push(SitemapEntry {
            permalink: Permalink::from_path(config, &routes::post(&post.slug))?,
            updated_at: post.date,
            priority: "0.7",
        });
    }

    for slug in taxonomy.slugs() {
        let category_posts = posts_by_category(slug, posts, taxonomy);
        if category_posts.is_empty() {
            continue;
        }

        entries.push(SitemapEntry {
            permalink: Permalink::from_path(config, &routes::category(slug))?,
            updated_at: newest(category_posts),
            priority: "0.6",
        });
    }

    Ok(entries)
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String, RenderError> {
    Ok(sitemap_template(entries).render_to_xml()?)
}

pub fn sitemap_template(entries: &[SitemapEntry]) -> HtmlElement {
    urlset()
        .attr("xmlns", "http://www.sitemaps.org/schemas/sitemap/0.9")
        .children(entries.iter().map(|entry| {
            url()
                .child(loc().text(entry.permalink.as_str()))
                .children(
                    entry
                        .updated_at
                        .as_ref()
                        .map(|updated_at| lastmod().text(to_w3c(updated_at))),
                )
                .child(priority().text(entry.priority))
        }))
}

fn urlset() -> HtmlElement {
    HtmlElement::new("urlset")
}

fn url() -> HtmlElement {
    HtmlElement::new("url")
}

fn loc() -> HtmlElement {
    HtmlElement::new("loc")
}

fn lastmod() -> HtmlElement {
    HtmlElement::new("lastmod")
}

fn priority() -> HtmlElement {
    HtmlElement::new("priority")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono_tz::Tz;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::taxonomy::CategoryNode;

    fn make_post(slug: &str, date: Option<&str>, category: &str) -> Post {
        let date = date.map(|date| format!("date: {date}\n")).unwrap_or_default();
        let text = format!("---\ntitle: {slug}\n{date}category: {category}\n---\n");

        Post::parse(&text, Path::new(&format!("{slug}.md")), Tz::UTC).unwrap()
    }

    fn summarize(entries: &[SitemapEntry]) -> Vec<(&str, Option<String>, &str)> {
        entries
            .iter()
            .map(|entry| {
                (
                    entry.permalink.path(),
                    entry.updated_at.as_ref().map(to_w3c),
                    entry.priority,
                )
            })
            .collect()
    }

    #[test]
    fn test_sitemap_entries() {
        let config = SiteConfig::default().with_base_url("https://example.com");
        let taxonomy = Taxonomy::new(vec![
            CategoryNode::new("Economy", "economy")
                .child(CategoryNode::new("Stocks", "stocks"))
                .child(CategoryNode::new("Crypto", "crypto")),
            CategoryNode::new("Daily", "daily"),
        ])
        .unwrap();
        let posts = vec![
            make_post("b", Some("2024-02-01"), "crypto"),
            make_post("a", Some("2024-01-01"), "stocks"),
            make_post("c", None, "stocks"),
        ];
        let pages = vec![Page::parse("---\ntitle: About\n---\n", Path::new("about.md"), Tz::UTC).unwrap()];

        let entries = sitemap_entries(&config, &taxonomy, &posts, &pages).unwrap();

        let feb = Some("2024-02-01T00:00:00Z".to_string());
        let jan = Some("2024-01-01T00:00:00Z".to_string());
        assert_eq!(
            summarize(&entries),
            vec![
                ("/", feb.clone(), "1.0"),
                ("/page-info/about/", None, "0.8"),
                ("/posts/b/", feb.clone(), "0.7"),
                ("/posts/a/", jan.clone(), "0.7"),
                ("/posts/c/", None, "0.7"),
                ("/category/economy/", feb.clone(), "0.6"),
                ("/category/stocks/", jan, "0.6"),
                ("/category/crypto/", feb, "0.6"),
            ]
        );
    }

    #[test]
    fn test_render_sitemap() {
        let config = SiteConfig::default().with_base_url("https://example.com");
        let entries = sitemap_entries(&config, &Taxonomy::default(), &[], &[]).unwrap();

        assert_eq!(
            render_sitemap(&entries).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"><url><loc>https://example.com/</loc><priority>1.0</priority></url></urlset>"
        );
    }
}
