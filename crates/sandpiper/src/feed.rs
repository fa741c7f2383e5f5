use chrono::{DateTime, FixedOffset};

use crate::content::{Post, UNCATEGORIZED};
use crate::date::to_rfc2822;
use crate::html::{link, title, HtmlElement};
use crate::permalink::Permalink;
use crate::render::RenderError;
use crate::{routes, SiteConfig};

/// Renders the RSS 2.0 feed for the newest posts.
///
/// `posts` are expected to be sorted newest-first.
pub fn render_feed(
    config: &SiteConfig,
    posts: &[Post],
    last_build_date: &DateTime<FixedOffset>,
) -> Result<String, RenderError> {
    let feed_url = Permalink::from_path(config, routes::FEED)?;
    let site_url = Permalink::from_path(config, routes::INDEX)?;

    let items = posts
        .iter()
        .take(config.feed.limit)
        .map(|post| feed_item(config, post))
        .collect::<Result<Vec<_>, _>>()?;

    let channel = channel()
        .child(title().text(config.title.clone()))
        .child(link().text(site_url.as_str()))
        .child(description().text(config.description.clone().unwrap_or_default()))
        .child(language().text(config.language.clone()))
        .child(last_build_date_element().text(to_rfc2822(last_build_date)))
        .child(generator().text("Sandpiper"))
        .child(
            HtmlElement::new("atom:link")
                .attr("href", feed_url.as_str())
                .attr("rel", "self")
                .attr("type", "application/rss+xml"),
        )
        .children(items);

    let rss = rss()
        .attr("version", "2.0")
        .attr("xmlns:atom", "http://www.w3.org/2005/Atom")
        .child(channel);

    Ok(rss.render_to_xml()?)
}

fn feed_item(config: &SiteConfig, post: &Post) -> Result<HtmlElement, RenderError> {
    let permalink = Permalink::from_path(config, &routes::post(&post.slug))?;

    let enclosure = match post.meta.cover_image.as_deref() {
        Some(cover_image) => Some(enclosure(config, cover_image)?),
        None => None,
    };

    Ok(item()
        .child(title().text(post.meta.title.clone()))
        .child(description().text(post.meta.excerpt.clone()))
        .child(link().text(permalink.as_str()))
        .child(
            guid()
                .attr("isPermaLink", "true")
                .text(permalink.as_str()),
        )
        .children(
            post.date
                .as_ref()
                .map(|date| pub_date().text(to_rfc2822(date))),
        )
        .children(
            (post.category() != UNCATEGORIZED).then(|| category().text(post.category())),
        )
        .children(post.author_name().map(|name| author().text(name)))
        .children(enclosure))
}

fn enclosure(config: &SiteConfig, cover_image: &str) -> Result<HtmlElement, RenderError> {
    let mime_type = mime_guess::from_path(cover_image).first_or_octet_stream();

    Ok(HtmlElement::new("enclosure")
        .attr("url", Permalink::resolve_url(config, cover_image)?)
        .attr("length", "0")
        .attr("type", mime_type.essence_str()))
}

macro_rules! rss_elements {
    ($($name:ident => $tag:literal),*) => {
        $(
            fn $name() -> HtmlElement {
                HtmlElement::new($tag)
            }
        )*
    }
}

rss_elements! {
    rss => "rss",
    channel => "channel",
    description => "description",
    language => "language",
    last_build_date_element => "lastBuildDate",
    generator => "generator",
    item => "item",
    guid => "guid",
    pub_date => "pubDate",
    category => "category",
    author => "author"
}
