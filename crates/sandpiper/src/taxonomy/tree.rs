use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A node in the category taxonomy.
///
/// Each node exclusively owns its children, so a taxonomy can never contain
/// cycles or shared nodes.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    /// The display name of the category.
    pub name: String,

    /// The identifier of the category, unique across the whole taxonomy.
    pub slug: String,

    /// The subcategories of this category, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Returns a new leaf [`CategoryNode`].
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            children: Vec::new(),
        }
    }

    /// Adds the given child to this node.
    pub fn child(mut self, child: CategoryNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the slugs of this node and all of its descendants.
    pub fn closure_slugs(&self) -> HashSet<&str> {
        let mut slugs = HashSet::new();
        self.collect_slugs(&mut slugs);
        slugs
    }

    fn collect_slugs<'a>(&'a self, slugs: &mut HashSet<&'a str>) {
        slugs.insert(self.slug.as_str());

        for child in &self.children {
            child.collect_slugs(slugs);
        }
    }
}

/// Returns the first node in `nodes` (searched depth-first, parents before
/// their children) whose slug is `target_slug`.
pub fn find_node<'a>(target_slug: &str, nodes: &'a [CategoryNode]) -> Option<&'a CategoryNode> {
    for node in nodes {
        if node.slug == target_slug {
            return Some(node);
        }

        if let Some(found) = find_node(target_slug, &node.children) {
            return Some(found);
        }
    }

    None
}

#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy '{filepath}': {source}")]
    Io {
        filepath: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid taxonomy JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("category slug '{slug}' is used by both '{first}' and '{second}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("category '{name}' has an empty slug")]
    EmptySlug { name: String },

    #[error("category '{name}' has slug '{slug}', which is not URL-safe")]
    InvalidSlug { name: String, slug: String },
}

/// The authored category hierarchy of a site.
///
/// A [`Taxonomy`] is immutable once loaded. Post counts are never written back
/// onto it; see [`Taxonomy::counted`].
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Taxonomy {
    roots: Vec<CategoryNode>,
}

impl Taxonomy {
    /// Returns a new [`Taxonomy`] with the given top-level categories.
    ///
    /// Fails if any slug is empty, not URL-safe, or appears more than once.
    pub fn new(roots: Vec<CategoryNode>) -> Result<Self, TaxonomyError> {
        let taxonomy = Self { roots };
        taxonomy.validate()?;

        Ok(taxonomy)
    }

    /// Loads a [`Taxonomy`] from a JSON file containing an array of categories.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            filepath: path.to_owned(),
            source,
        })?;

        let taxonomy = Self::from_json(&contents)?;
        debug!(path = %path.display(), categories = taxonomy.slugs().len(), "loaded taxonomy");

        Ok(taxonomy)
    }

    pub fn from_json(text: &str) -> Result<Self, TaxonomyError> {
        let roots: Vec<CategoryNode> = serde_json::from_str(text)?;

        Self::new(roots)
    }

    pub fn roots(&self) -> &[CategoryNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns the category with the given slug, if there is one.
    pub fn find(&self, slug: &str) -> Option<&CategoryNode> {
        find_node(slug, &self.roots)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.find(slug).is_some()
    }

    /// Returns the display name for the given slug, falling back to the slug
    /// itself for categories that are not in the taxonomy.
    pub fn name_for<'a>(&'a self, slug: &'a str) -> &'a str {
        self.find(slug).map_or(slug, |node| node.name.as_str())
    }

    /// Returns every slug in the taxonomy, parents before their children.
    pub fn slugs(&self) -> Vec<&str> {
        fn walk<'a>(nodes: &'a [CategoryNode], slugs: &mut Vec<&'a str>) {
            for node in nodes {
                slugs.push(&node.slug);
                walk(&node.children, slugs);
            }
        }

        let mut slugs = Vec::new();
        walk(&self.roots, &mut slugs);
        slugs
    }

    /// Returns the set of post categories that a query for `requested_slug`
    /// matches.
    ///
    /// For a slug in the taxonomy this is the slug and all of its descendants.
    /// Any other slug only matches itself.
    pub fn resolve_slugs<'a>(&'a self, requested_slug: &'a str) -> HashSet<&'a str> {
        match self.find(requested_slug) {
            Some(node) => node.closure_slugs(),
            None => HashSet::from_iter([requested_slug]),
        }
    }

    fn validate(&self) -> Result<(), TaxonomyError> {
        fn walk<'a>(
            nodes: &'a [CategoryNode],
            seen: &mut HashMap<&'a str, &'a str>,
        ) -> Result<(), TaxonomyError> {
            for node in nodes {
                if node.slug.is_empty() {
                    return Err(TaxonomyError::EmptySlug {
                        name: node.name.clone(),
                    });
                }

                if let Some(first) = seen.insert(&node.slug, &node.name) {
                    return Err(TaxonomyError::DuplicateSlug {
                        slug: node.slug.clone(),
                        first: first.to_string(),
                        second: node.name.clone(),
                    });
                }

                if slug::slugify(&node.slug) != node.slug {
                    return Err(TaxonomyError::InvalidSlug {
                        name: node.name.clone(),
                        slug: node.slug.clone(),
                    });
                }

                walk(&node.children, seen)?;
            }

            Ok(())
        }

        walk(&self.roots, &mut HashMap::new())
    }
}
