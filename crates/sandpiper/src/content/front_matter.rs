use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

static TOML_REGEX: OnceLock<Regex> = OnceLock::new();
static YAML_REGEX: OnceLock<Regex> = OnceLock::new();

fn toml_regex() -> &'static Regex {
    TOML_REGEX.get_or_init(|| {
        let pattern = r"^[[:space:]]*\+\+\+(\r?\n(?s).*?(?-s))\+\+\+[[:space:]]*(?:$|(?:\r?\n((?s).*(?-s))$))";
        Regex::new(pattern).expect("failed to compile regex for TOML front matter")
    })
}

fn yaml_regex() -> &'static Regex {
    YAML_REGEX.get_or_init(|| {
        let pattern = r"^[[:space:]]*---(\r?\n(?s).*?(?-s))---[[:space:]]*(?:$|(?:\r?\n((?s).*(?-s))$))";
        Regex::new(pattern).expect("failed to compile regex for YAML front matter")
    })
}

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("no front matter found")]
    Missing,

    #[error("invalid TOML front matter: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FrontMatterFormat {
    /// Delimited by `+++`.
    Toml,
    /// Delimited by `---`.
    Yaml,
}

#[derive(Debug)]
pub struct RawFrontMatter<'a> {
    pub format: FrontMatterFormat,
    text: &'a str,
}

impl RawFrontMatter<'_> {
    fn deserialize<T>(&self) -> Result<T, FrontMatterError>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.format {
            FrontMatterFormat::Toml => Ok(toml::from_str(self.text)?),
            FrontMatterFormat::Yaml => Ok(serde_yaml::from_str(self.text)?),
        }
    }
}

/// Splits the given content into its raw front matter and body.
pub fn split_front_matter(content: &str) -> Option<(RawFrontMatter<'_>, &str)> {
    [
        (FrontMatterFormat::Toml, toml_regex()),
        (FrontMatterFormat::Yaml, yaml_regex()),
    ]
    .into_iter()
    .find_map(|(format, regex)| {
        let captures = regex.captures(content)?;
        let text = captures.get(1)?.as_str();
        let body = captures.get(2).map_or("", |m| m.as_str());

        Some((RawFrontMatter { format, text }, body))
    })
}

/// Parses the front matter at the start of the given content, returning it
/// along with the rest of the content.
pub fn parse_front_matter<T>(content: &str) -> Result<(T, &str), FrontMatterError>
where
    T: serde::de::DeserializeOwned,
{
    let (front_matter, body) = split_front_matter(content).ok_or(FrontMatterError::Missing)?;

    Ok((front_matter.deserialize()?, body))
}

/// Deserializes an optional date that may be written either as a string or as
/// a native TOML datetime.
pub fn from_toml_datetime<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DatetimeOrString {
        Datetime(toml::value::Datetime),
        String(String),
    }

    match Option::<DatetimeOrString>::deserialize(deserializer)? {
        Some(DatetimeOrString::Datetime(datetime)) => Ok(Some(datetime.to_string())),
        Some(DatetimeOrString::String(string)) => Ok(Some(string)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct TestFrontMatter {
        title: String,
        #[serde(default, deserialize_with = "from_toml_datetime")]
        date: Option<String>,
    }

    #[test]
    fn test_toml_front_matter() {
        let text = indoc! {r#"
            +++
            title = "Hello"
            date = 2024-01-01
            +++

            Body text.
        "#};

        let (front_matter, body) = parse_front_matter::<TestFrontMatter>(text).unwrap();

        assert_eq!(
            front_matter,
            TestFrontMatter {
                title: "Hello".into(),
                date: Some("2024-01-01".into())
            }
        );
        assert_eq!(body, "Body text.\n");
    }

    #[test]
    fn test_yaml_front_matter() {
        let text = indoc! {r#"
            ---
            title: "Hello"
            date: "2020-03-16T05:35:07.322Z"
            ---

            Body text.
        "#};

        let (front_matter, body) = parse_front_matter::<TestFrontMatter>(text).unwrap();

        assert_eq!(
            front_matter,
            TestFrontMatter {
                title: "Hello".into(),
                date: Some("2020-03-16T05:35:07.322Z".into())
            }
        );
        assert_eq!(body.trim(), "Body text.");
    }

    #[test]
    fn test_unquoted_yaml_date() {
        let text = "---\ntitle: Hello\ndate: 2024-05-01\n---\n";

        let (front_matter, body) = parse_front_matter::<TestFrontMatter>(text).unwrap();

        assert_eq!(front_matter.date.as_deref(), Some("2024-05-01"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_missing_date() {
        let text = "+++\ntitle = \"Undated\"\n+++\n";

        let (front_matter, _) = parse_front_matter::<TestFrontMatter>(text).unwrap();

        assert_eq!(front_matter.date, None);
    }

    #[test]
    fn test_missing_front_matter() {
        let result = parse_front_matter::<TestFrontMatter>("Just a body.");

        assert!(matches!(result, Err(FrontMatterError::Missing)));
    }

    #[test]
    fn test_invalid_front_matter() {
        let result = parse_front_matter::<TestFrontMatter>("+++\ntitle = \n+++\n");

        assert!(matches!(result, Err(FrontMatterError::Toml(_))));
    }
}
