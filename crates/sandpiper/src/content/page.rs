use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::content::{from_toml_datetime, parse_front_matter, slug_from_path, FrontMatterError};
use crate::date::{parse_date, DateError};

/// A standalone page, such as an "about" or privacy policy page.
#[derive(Debug, Clone)]
pub struct Page {
    pub meta: PageFrontMatter,
    pub file_path: PathBuf,
    pub slug: String,
    pub date: Option<DateTime<FixedOffset>>,
    pub raw_content: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct PageFrontMatter {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "from_toml_datetime")]
    pub date: Option<String>,
    pub excerpt: Option<String>,
}

#[derive(Error, Debug)]
pub enum ParsePageError {
    #[error("failed to read page: {0}")]
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

impl Page {
    pub fn from_path(path: impl AsRef<Path>, timezone: Tz) -> Result<Self, ParsePageError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        Self::parse(&contents, path, timezone)
    }

    pub fn parse(text: &str, filepath: &Path, timezone: Tz) -> Result<Self, ParsePageError> {
        let (front_matter, content) =
            parse_front_matter::<PageFrontMatter>(text).map_err(|source| {
                ParsePageError::InvalidFrontMatter {
                    filepath: filepath.to_owned(),
                    source,
                }
            })?;

        let slug = slug_from_path(filepath).ok_or_else(|| ParsePageError::InvalidFilename {
            filepath: filepath.to_owned(),
        })?;

        let date = front_matter
            .date
            .as_deref()
            .map(|date| parse_date(date, timezone))
            .transpose()
            .map_err(|source| ParsePageError::InvalidDate {
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
}
