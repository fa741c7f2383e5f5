use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

/// The name of the configuration file at the root of a site.
pub const CONFIG_FILENAME: &str = "sandpiper.toml";

/// The environment variable that overrides [`SiteConfig::base_url`].
pub const BASE_URL_ENV_VAR: &str = "SANDPIPER_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{filepath}': {source}")]
    Io {
        filepath: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("unknown timezone '{name}': {reason}")]
    UnknownTimezone { name: String, reason: String },

    #[error("invalid base URL '{base_url}': {source}")]
    InvalidBaseUrl {
        base_url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub title: String,
    pub description: Option<String>,
    pub language: String,
    timezone: String,
    pub output_dir: PathBuf,
    pub content: ContentConfig,
    pub feed: FeedConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            title: String::new(),
            description: None,
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            output_dir: PathBuf::from("public"),
            content: ContentConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub posts_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub categories: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_dir: PathBuf::from("_posts"),
            pages_dir: PathBuf::from("_pages"),
            categories: PathBuf::from("data/categories.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// The number of most recent posts included in the feed.
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { limit: 30 }
    }
}

impl SiteConfig {
    /// Loads the config from `sandpiper.toml` in the given site root, applying
    /// any environment overrides.
    pub fn load(root_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_path(root_path.as_ref().join(CONFIG_FILENAME))?;

        config.with_overrides(|name| std::env::var(name).ok())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            filepath: path.to_owned(),
            source,
        })?;

        Self::parse(&contents)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    /// Applies overrides looked up by environment variable name.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(base_url) = lookup(BASE_URL_ENV_VAR).filter(|value| !value.trim().is_empty()) {
            self.set_base_url(base_url)?;
        }

        Ok(self)
    }

    /// Replaces the base URL, rejecting values that don't parse as a URL.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<(), ConfigError> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;

        self.base_url = base_url;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the timezone that dates without an offset are interpreted in.
    pub fn timezone(&self) -> Tz {
        // Validated when the config is parsed.
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| ConfigError::UnknownTimezone {
                name: self.timezone.clone(),
                reason: err.to_string(),
            })?;

        validate_base_url(&self.base_url)
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    url::Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        source,
    })?;

    Ok(())
}
