use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::content::{Page, ParsePageError, ParsePostError, Post};

/// A read-only source of site content.
pub trait ContentRepository {
    type Error: std::error::Error;

    /// Returns every post, in no particular order.
    fn list_all_posts(&self) -> Result<Vec<Post>, Self::Error>;

    /// Returns every page, in no particular order.
    fn list_all_pages(&self) -> Result<Vec<Page>, Self::Error>;

    fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, Self::Error> {
        Ok(self
            .list_all_posts()?
            .into_iter()
            .find(|post| post.slug == slug))
    }

    fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, Self::Error> {
        Ok(self
            .list_all_pages()?
            .into_iter()
            .find(|page| page.slug == slug))
    }
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("failed to walk content directory: {0}")]
    Io(#[from] walkdir::Error),

    #[error("failed to parse post: {0}")]
    ParsePost(#[from] ParsePostError),

    #[error("failed to parse page: {0}")]
    ParsePage(#[from] ParsePageError),
}

/// Content stored as Markdown files in a posts directory and a pages
/// directory.
///
/// Each file directly inside a directory is one item, and its file stem is the
/// item's slug.
pub struct DiskRepository {
    posts_path: PathBuf,
    pages_path: PathBuf,
    timezone: Tz,
}

impl DiskRepository {
    /// Returns a new [`DiskRepository`].
    pub fn new(posts_path: PathBuf, pages_path: PathBuf, timezone: Tz) -> Self {
        Self {
            posts_path,
            pages_path,
            timezone,
        }
    }

    fn markdown_files(&self, dir: &Path) -> Result<Vec<PathBuf>, RepositoryError> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "content directory does not exist");
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        let mut files = Vec::new();

        for entry in walker {
            let entry = entry?;

            let Some(filename) = entry.file_name().to_str() else {
                continue;
            };

            if !entry.file_type().is_file()
                || !filename.ends_with(".md")
                || filename.starts_with('.')
            {
                continue;
            }

            files.push(entry.into_path());
        }

        Ok(files)
    }
}

impl ContentRepository for DiskRepository {
    type Error = RepositoryError;

    fn list_all_posts(&self) -> Result<Vec<Post>, Self::Error> {
        let mut posts = Vec::new();

        for path in self.markdown_files(&self.posts_path)? {
            let post = Post::from_path(&path, self.timezone)?;
            debug!(slug = %post.slug, category = %post.category(), "loaded post");

            posts.push(post);
        }

        Ok(posts)
    }

    fn list_all_pages(&self) -> Result<Vec<Page>, Self::Error> {
        let mut pages = Vec::new();

        for path in self.markdown_files(&self.pages_path)? {
            let page = Page::from_path(&path, self.timezone)?;
            debug!(slug = %page.slug, "loaded page");

            pages.push(page);
        }

        Ok(pages)
    }

    fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, Self::Error> {
        let path = self.posts_path.join(format!("{slug}.md"));
        if !path.is_file() {
            return Ok(None);
        }

        Ok(Some(Post::from_path(&path, self.timezone)?))
    }

    fn page_by_slug(&self, slug: &str) -> Result<Option<Page>, Self::Error> {
        let path = self.pages_path.join(format!("{slug}.md"));
        if !path.is_file() {
            return Ok(None);
        }

        Ok(Some(Page::from_path(&path, self.timezone)?))
    }
}

/// Content held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRepository {
    posts: Vec<Post>,
    pages: Vec<Page>,
}

impl InMemoryRepository {
    /// Returns a new [`InMemoryRepository`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given [`Post`] to the repository.
    pub fn add_post(&mut self, post: Post) {
        self.posts.push(post);
    }

    /// Adds the given [`Page`] to the repository.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }
}

impl ContentRepository for InMemoryRepository {
    type Error = std::convert::Infallible;

    fn list_all_posts(&self) -> Result<Vec<Post>, Self::Error> {
        Ok(self.posts.clone())
    }

    fn list_all_pages(&self) -> Result<Vec<Page>, Self::Error> {
        Ok(self.pages.clone())
    }
}
