use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::content::{from_toml_datetime, parse_front_matter, slug_from_path, FrontMatterError};
use crate::date::{parse_date, DateError};
use crate::taxonomy::Categorized;

/// The category of posts that do not name one.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone)]
pub struct Post {
    pub meta: PostFrontMatter,
    pub file_path: PathBuf,
    pub slug: String,
    pub date: Option<DateTime<FixedOffset>>,
    pub raw_content: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFrontMatter {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "from_toml_datetime")]
    pub date: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub author: Option<Author>,
    pub og_image: Option<OgImage>,
    pub category: Option<String>,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "AuthorRepr")]
pub struct Author {
    pub name: String,
    pub picture: Option<String>,
}

/// Authors may be written as a bare name or as a table.
#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorRepr {
    Name(String),
    Full {
        name: String,
        picture: Option<String>,
    },
}

impl From<AuthorRepr> for Author {
    fn from(value: AuthorRepr) -> Self {
        match value {
            AuthorRepr::Name(name) => Self {
                name,
                picture: None,
            },
            AuthorRepr::Full { name, picture } => Self { name, picture },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OgImage {
    pub url: String,
}

#[derive(Error, Debug)]
pub enum ParsePostError {
    #[error("failed to read post: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid front matter in '{filepath}': {source}")]
    InvalidFrontMatter {
        filepath: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("invalid date in '{filepath}': {source}")]
    InvalidDate {
        filepath: PathBuf,
        #[source]
        source: DateError,
    },

    #[error("cannot derive a slug from '{filepath}'")]
    InvalidFilename { filepath: PathBuf },
}

impl Post {
    pub fn from_path(path: impl AsRef<Path>, timezone: Tz) -> Result<Self, ParsePostError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        Self::parse(&contents, path, timezone)
    }

    pub fn parse(text: &str, filepath: &Path, timezone: Tz) -> Result<Self, ParsePostError> {
        let (front_matter, content) =
            parse_front_matter::<PostFrontMatter>(text).map_err(|source| {
                ParsePostError::InvalidFrontMatter {
                    filepath: filepath.to_owned(),
                    source,
                }
            })?;

        let slug = slug_from_path(filepath).ok_or_else(|| ParsePostError::InvalidFilename {
            filepath: filepath.to_owned(),
        })?;

        let date = front_matter
            .date
            .as_deref()
            .map(|date| parse_date(date, timezone))
            .transpose()
            .map_err(|source| ParsePostError::InvalidDate {
                filepath: filepath.to_owned(),
                source,
            })?;

        Ok(Self {
            meta: front_matter,
            file_path: filepath.to_owned(),
            slug,
            date,
            raw_content: content.to_string(),
        })
    }

    /// Returns the slug of the category this post is filed under.
    pub fn category(&self) -> &str {
        self.meta
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.meta.author.as_ref().map(|author| author.name.as_str())
    }
}

impl Categorized for Post {
    fn category(&self) -> &str {
        Post::category(self)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_post() {
        let text = indoc! {r#"
            ---
            title: "Reading the Fed minutes"
            excerpt: "What the minutes say about rates."
            coverImage: "/assets/blog/fed/cover.png"
            date: "2025-02-20T09:00:00.000Z"
            author:
              name: Don Q
              picture: "/assets/blog/authors/donq.png"
            ogImage:
              url: "/assets/blog/fed/cover.png"
            category: "macro"
            ---

            The minutes were **hawkish**.
        "#};

        let post = Post::parse(text, Path::new("_posts/fed-minutes.md"), Tz::UTC).unwrap();

        assert_eq!(post.slug, "fed-minutes");
        assert_eq!(post.category(), "macro");
        assert_eq!(post.meta.title, "Reading the Fed minutes");
        assert_eq!(post.meta.excerpt, "What the minutes say about rates.");
        assert_eq!(
            post.meta.cover_image.as_deref(),
            Some("/assets/blog/fed/cover.png")
        );
        assert_eq!(
            post.meta.author,
            Some(Author {
                name: "Don Q".into(),
                picture: Some("/assets/blog/authors/donq.png".into())
            })
        );
        assert_eq!(
            post.meta.og_image,
            Some(OgImage {
                url: "/assets/blog/fed/cover.png".into()
            })
        );
        assert_eq!(
            post.date.unwrap().to_rfc3339(),
            "2025-02-20T09:00:00+00:00"
        );
        assert_eq!(post.raw_content.trim(), "The minutes were **hawkish**.");
    }

    #[test]
    fn test_author_as_bare_name() {
        let text = "+++\ntitle = \"Hi\"\nauthor = \"Don Q\"\n+++\n";

        let post = Post::parse(text, Path::new("hi.md"), Tz::UTC).unwrap();

        assert_eq!(post.author_name(), Some("Don Q"));
    }

    #[test]
    fn test_missing_category_is_uncategorized() {
        let post = Post::parse("---\ntitle: Hi\n---\n", Path::new("hi.md"), Tz::UTC).unwrap();
        assert_eq!(post.category(), UNCATEGORIZED);

        let post = Post::parse(
            "---\ntitle: Hi\ncategory: \"\"\n---\n",
            Path::new("hi.md"),
            Tz::UTC,
        )
        .unwrap();
        assert_eq!(post.category(), UNCATEGORIZED);
    }

    #[test]
    fn test_date_in_site_timezone() {
        let post = Post::parse(
            "---\ntitle: Hi\ndate: 2025-01-01\n---\n",
            Path::new("hi.md"),
            Tz::Asia__Seoul,
        )
        .unwrap();

        assert_eq!(
            post.date.unwrap().to_rfc3339(),
            "2025-01-01T00:00:00+09:00"
        );
    }

    #[test]
    fn test_invalid_date() {
        let result = Post::parse(
            "---\ntitle: Hi\ndate: someday\n---\n",
            Path::new("hi.md"),
            Tz::UTC,
        );

        assert!(matches!(result, Err(ParsePostError::InvalidDate { .. })));
    }

    #[test]
    fn test_missing_front_matter() {
        let result = Post::parse("No front matter here.", Path::new("hi.md"), Tz::UTC);

        assert!(matches!(
            result,
            Err(ParsePostError::InvalidFrontMatter { .. })
        ));
    }
}
