//! Page templates for the rendered site.

use std::fmt;

use thiserror::Error;

use crate::content::{Page, Post};
use crate::date::{format_date, to_w3c};
use crate::html::*;
use crate::markdown::markdown_to_html;
use crate::permalink::Permalink;
use crate::routes;
use crate::taxonomy::{total_count, CountedCategory, Taxonomy};
use crate::SiteConfig;

const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("render error: {0}")]
    Format(#[from] fmt::Error),
}

/// Per-page metadata for the document head.
#[derive(Debug, Default)]
pub struct PageMeta<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub image: Option<&'a str>,
    pub is_article: bool,
}

impl<'a> PageMeta<'a> {
    fn titled(title: &'a str) -> Self {
        Self {
            title: Some(title),
            ..Default::default()
        }
    }
}

/// The site-wide data every template has access to.
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    pub taxonomy: &'a Taxonomy,
    pub categories: &'a [CountedCategory],
}

impl<'a> RenderContext<'a> {
    fn display_date(&self, post: &Post) -> Option<HtmlElement> {
        let date = post.date.as_ref()?;

        Some(
            time()
                .attr("datetime", to_w3c(date))
                .text(format_date(date, DISPLAY_DATE_FORMAT, self.config.timezone())),
        )
    }

    fn layout(&self, page: PageMeta, content: HtmlElement) -> HtmlElement {
        let document_title = match page.title {
            Some(page_title) if !self.config.title.is_empty() => {
                format!("{page_title} | {}", self.config.title)
            }
            Some(page_title) => page_title.to_string(),
            None => self.config.title.clone(),
        };
        let description = page
            .description
            .or(self.config.description.as_deref())
            .map(str::to_string);
        let image = page.image.map(|image| {
            Permalink::resolve_url(self.config, image).unwrap_or_else(|_| image.to_string())
        });

        html()
            .lang(self.config.language.clone())
            .child(
                head()
                    .child(meta().attr("charset", "utf-8"))
                    .child(
                        meta()
                            .attr("name", "viewport")
                            .attr("content", "width=device-width, initial-scale=1"),
                    )
                    .child(
                        meta()
                            .attr("name", "description")
                            .attr::<String>("content", description.clone()),
                    )
                    .child(
                        meta()
                            .attr("property", "og:title")
                            .attr("content", page.title.unwrap_or(&self.config.title).to_string()),
                    )
                    .child(
                        meta()
                            .attr("property", "og:type")
                            .attr("content", if page.is_article { "article" } else { "website" }),
                    )
                    .child(
                        meta()
                            .attr("property", "og:description")
                            .attr::<String>("content", description),
                    )
                    .children(
                        image
                            .clone()
                            .map(|image| meta().attr("property", "og:image").attr("content", image)),
                    )
                    .child(meta().attr("name", "twitter:card").attr(
                        "content",
                        if image.is_some() { "summary_large_image" } else { "summary" },
                    ))
                    .child(
                        meta()
                            .attr("name", "twitter:title")
                            .attr("content", page.title.unwrap_or(&self.config.title).to_string()),
                    )
                    .children(
                        image.map(|image| meta().attr("name", "twitter:image").attr("content", image)),
                    )
                    .child(title().text(document_title))
                    .child(
                        link()
                            .rel("alternate")
                            .attr("type", "application/rss+xml")
                            .attr("title", self.config.title.clone())
                            .href(routes::FEED),
                    ),
            )
            .child(
                body()
                    .child(
                        header().class("site-header").child(
                            nav()
                                .child(a().href(routes::INDEX).text(self.config.title.clone()))
                                .child(a().href(routes::SEARCH).text("Search")),
                        ),
                    )
                    .child(
                        div()
                            .class("container")
                            .child(main().child(content))
                            .child(aside().class("sidebar").child(self.category_menu())),
                    ),
            )
    }

    /// Renders the nested category menu, with each entry showing its count.
    pub fn category_menu(&self) -> HtmlElement {
        fn menu_items(categories: &[CountedCategory]) -> HtmlElement {
            ul().children(categories.iter().map(|category| {
                li().child(
                    a().href(routes::category(&category.slug))
                        .text(format!("{} ({})", category.name, category.count)),
                )
                .children((!category.is_leaf()).then(|| menu_items(&category.children)))
            }))
        }

        nav()
            .class("category-menu")
            .child(h2().text(format!("Categories ({})", total_count(self.categories))))
            .child(menu_items(self.categories))
    }

    fn post_preview(&self, post: &Post, heading: fn() -> HtmlElement) -> HtmlElement {
        article()
            .class("post-preview")
            .children(post.meta.cover_image.as_ref().map(|cover_image| {
                a().href(routes::post(&post.slug))
                    .child(img().src(cover_image.clone()).alt(post.meta.title.clone()))
            }))
            .child(heading().child(a().href(routes::post(&post.slug)).text(post.meta.title.clone())))
            .children(self.display_date(post))
            .child(p().text(post.meta.excerpt.clone()))
            .children(
                post.author_name()
                    .map(|name| div().class("author").text(name.to_string())),
            )
    }

    /// Renders a listing with the first post as the hero and the rest below it.
    fn post_listing(&self, posts: &[&Post]) -> Vec<HtmlElement> {
        let Some((hero_post, more_posts)) = posts.split_first() else {
            return Vec::new();
        };

        let mut listing = vec![section()
            .class("hero-post")
            .child(self.post_preview(hero_post, h2))];

        if !more_posts.is_empty() {
            listing.push(
                section()
                    .class("more-stories")
                    .child(h2().text("More Stories"))
                    .children(more_posts.iter().map(|post| self.post_preview(post, h3))),
            );
        }

        listing
    }

    pub fn index_page(&self, posts: &[Post]) -> HtmlElement {
        let posts = posts.iter().collect::<Vec<_>>();

        self.layout(
            PageMeta::default(),
            div()
                .class("index")
                .child(h1().text(self.config.title.clone()))
                .children(self.post_listing(&posts)),
        )
    }

    pub fn post_page(&self, post: &Post) -> HtmlElement {
        let category = post.category();
        let page = PageMeta {
            title: Some(&post.meta.title),
            description: Some(post.meta.excerpt.as_str()).filter(|excerpt| !excerpt.is_empty()),
            image: post
                .meta
                .og_image
                .as_ref()
                .map(|og_image| og_image.url.as_str())
                .or(post.meta.cover_image.as_deref()),
            is_article: true,
        };

        self.layout(
            page,
            article()
                .class("post")
                .children(
                    post.meta
                        .preview
                        .then(|| div().class("preview-banner").text("This post is a preview.")),
                )
                .child(h1().text(post.meta.title.clone()))
                .children(self.display_date(post))
                .children(
                    post.author_name()
                        .map(|name| div().class("author").text(name.to_string())),
                )
                .child(
                    a().class("category")
                        .href(routes::category(category))
                        .text(self.taxonomy.name_for(category).to_string()),
                )
                .children(post.meta.cover_image.as_ref().map(|cover_image| {
                    img()
                        .class("cover-image")
                        .src(cover_image.clone())
                        .alt(post.meta.title.clone())
                }))
                .child(div().class("content").raw(markdown_to_html(&post.raw_content))),
        )
    }

    pub fn static_page(&self, page: &Page) -> HtmlElement {
        self.layout(
            PageMeta::titled(&page.meta.title),
            article()
                .class("page")
                .child(h1().text(page.meta.title.clone()))
                .child(div().class("content").raw(markdown_to_html(&page.raw_content))),
        )
    }

    /// Renders the listing for a category, including posts in its subcategories.
    pub fn category_page(&self, slug: &str, posts: &[&Post]) -> HtmlElement {
        let name = self.taxonomy.name_for(slug);

        let listing = if posts.is_empty() {
            vec![p().class("empty").text("There are no posts in this category yet.")]
        } else {
            self.post_listing(posts)
        };

        self.layout(
            PageMeta::titled(name),
            div()
                .class("category")
                .child(h1().text(name.to_string()))
                .children(listing),
        )
    }

    pub fn search_page(&self, query: &str, results: &[&Post]) -> HtmlElement {
        let summary = if query.trim().is_empty() {
            None
        } else if results.is_empty() {
            Some(p().text(format!("No posts match \"{query}\".")))
        } else {
            Some(p().text(format!("{} results for \"{query}\".", results.len())))
        };

        self.layout(
            PageMeta::titled("Search"),
            div()
                .class("search")
                .child(h1().text("Search"))
                .child(
                    form()
                        .attr("action", routes::SEARCH)
                        .attr("method", "get")
                        .child(
                            input()
                                .attr("type", "search")
                                .attr("name", "q")
                                .attr("value", query.to_string()),
                        )
                        .child(button().attr("type", "submit").text("Search")),
                )
                .children(summary)
                .child(ul().class("results").children(results.iter().map(|post| {
                    li().child(a().href(routes::post(&post.slug)).text(post.meta.title.clone()))
                        .child(p().text(post.meta.excerpt.clone()))
                }))),
        )
    }
}
