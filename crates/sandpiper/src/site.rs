use std::convert::Infallible;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audit::{audit_posts, ContentIssue};
use crate::content::{
    sort_posts_by_date, ContentRepository, DiskRepository, Page, Pages, Post, Posts,
    RepositoryError,
};
use crate::feed::render_feed;
use crate::render::{RenderContext, RenderError};
use crate::search::{search_index, search_posts};
use crate::sitemap::{render_sitemap, sitemap_entries};
use crate::storage::{DiskStorage, Store};
use crate::taxonomy::{posts_by_category, tally_categories, CountedCategory, Taxonomy, TaxonomyError};
use crate::{routes, ConfigError, SiteConfig};

#[derive(Error, Debug)]
pub enum LoadSiteError {
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load categories: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("failed to load content: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<Infallible> for LoadSiteError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

#[derive(Error, Debug)]
pub enum RenderSiteError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::fmt::Error> for RenderSiteError {
    fn from(value: std::fmt::Error) -> Self {
        Self::Render(RenderError::Format(value))
    }
}

/// A loaded blog: its config, category taxonomy, posts, and pages.
pub struct Site {
    root_path: PathBuf,
    config: SiteConfig,
    taxonomy: Taxonomy,
    posts: Posts,
    pages: Pages,
}

impl Site {
    /// Loads the site rooted at the given path, reading `sandpiper.toml` for
    /// its config.
    pub fn load(root_path: impl AsRef<Path>) -> Result<Self, LoadSiteError> {
        let root_path = root_path.as_ref();
        let config = SiteConfig::load(root_path)?;

        Self::load_with_config(root_path, config)
    }

    pub fn load_with_config(
        root_path: impl AsRef<Path>,
        config: SiteConfig,
    ) -> Result<Self, LoadSiteError> {
        let root_path = root_path.as_ref();

        let taxonomy = Taxonomy::from_path(root_path.join(&config.content.categories))?;
        let repository = DiskRepository::new(
            root_path.join(&config.content.posts_dir),
            root_path.join(&config.content.pages_dir),
            config.timezone(),
        );

        let mut site = Self::from_repository(config, taxonomy, &repository)?;
        site.root_path = root_path.to_owned();

        Ok(site)
    }

    /// Builds a site from the content in the given repository.
    pub fn from_repository<R>(
        config: SiteConfig,
        taxonomy: Taxonomy,
        repository: &R,
    ) -> Result<Self, LoadSiteError>
    where
        R: ContentRepository,
        LoadSiteError: From<R::Error>,
    {
        let posts = sort_posts_by_date(repository.list_all_posts()?);

        let mut pages = repository.list_all_pages()?;
        pages.sort_by(|a, b| a.slug.cmp(&b.slug));

        info!(
            posts = posts.len(),
            pages = pages.len(),
            categories = taxonomy.slugs().len(),
            "loaded site"
        );

        for issue in audit_posts(&posts, &taxonomy) {
            warn!("{issue}");
        }

        Ok(Self {
            root_path: PathBuf::from("."),
            config,
            taxonomy,
            posts: Posts(posts),
            pages: Pages(pages),
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Returns the posts, newest first.
    pub fn posts(&self) -> &Posts {
        &self.posts
    }

    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    pub fn output_path(&self) -> PathBuf {
        self.root_path.join(&self.config.output_dir)
    }

    /// Returns the taxonomy with the number of posts in each category.
    ///
    /// The counts are computed fresh on every call.
    pub fn categories(&self) -> Vec<CountedCategory> {
        self.taxonomy.counted(&tally_categories(&self.posts[..]))
    }

    pub fn posts_by_category(&self, slug: &str) -> Vec<&Post> {
        posts_by_category(slug, &self.posts[..], &self.taxonomy)
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.by_slug(slug)
    }

    pub fn page_by_slug(&self, slug: &str) -> Option<&Page> {
        self.pages.by_slug(slug)
    }

    pub fn search(&self, query: &str) -> Vec<&Post> {
        search_posts(query, &self.posts)
    }

    pub fn issues(&self) -> Vec<ContentIssue> {
        audit_posts(&self.posts, &self.taxonomy)
    }

    /// Renders the search page with the results for `query`.
    pub fn render_search_page(&self, query: &str) -> Result<String, RenderSiteError> {
        let categories = self.categories();
        let results = self.search(query);

        Ok(self
            .render_context(&categories)
            .search_page(query, &results)
            .render_to_string()?)
    }

    fn render_context<'a>(&'a self, categories: &'a [CountedCategory]) -> RenderContext<'a> {
        RenderContext {
            config: &self.config,
            taxonomy: &self.taxonomy,
            categories,
        }
    }

    /// Renders the site to the output directory.
    pub fn build(&self) -> Result<PathBuf, RenderSiteError> {
        let output_path = self.output_path();
        let storage = DiskStorage::new(output_path.clone());

        self.render_to(&storage, &Utc::now().fixed_offset())?;
        info!(output = %output_path.display(), "built site");

        Ok(output_path)
    }

    /// Renders every route of the site into the given storage.
    pub fn render_to<S: Store>(
        &self,
        storage: &S,
        build_date: &DateTime<FixedOffset>,
    ) -> Result<(), RenderSiteError> {
        fn store_err(err: impl std::error::Error) -> RenderSiteError {
            RenderSiteError::Storage(err.to_string())
        }

        let categories = self.categories();
        let ctx = self.render_context(&categories);

        let store_html = |route: &str, rendered: String| {
            debug!(route, "rendered");
            storage.store_html(route, rendered).map_err(store_err)
        };

        store_html(routes::INDEX, ctx.index_page(&self.posts).render_to_string()?)?;

        for post in self.posts.iter() {
            store_html(&routes::post(&post.slug), ctx.post_page(post).render_to_string()?)?;
        }

        for page in self.pages.iter() {
            store_html(&routes::page(&page.slug), ctx.static_page(page).render_to_string()?)?;
        }

        for slug in self.taxonomy.slugs() {
            let posts = self.posts_by_category(slug);

            store_html(
                &routes::category(slug),
                ctx.category_page(slug, &posts).render_to_string()?,
            )?;
        }

        store_html(routes::SEARCH, ctx.search_page("", &[]).render_to_string()?)?;

        info!(
            posts = self.posts.len(),
            pages = self.pages.len(),
            categories = categories.len(),
            "rendered pages"
        );

        storage
            .store_file(
                routes::FEED,
                render_feed(&self.config, &self.posts, build_date)?,
            )
            .map_err(store_err)?;

        let sitemap = sitemap_entries(&self.config, &self.taxonomy, &self.posts, &self.pages)
            .map_err(RenderError::from)?;
        storage
            .store_file(routes::SITEMAP, render_sitemap(&sitemap)?)
            .map_err(store_err)?;

        storage
            .store_file(
                routes::SEARCH_INDEX,
                serde_json::to_string(&search_index(&self.posts))?,
            )
            .map_err(store_err)?;

        storage
            .store_file(routes::CATEGORIES, serde_json::to_string_pretty(&categories)?)
            .map_err(store_err)?;

        Ok(())
    }
}
