use std::collections::HashMap;

use derive_more::Deref;
use serde::Serialize;

use crate::taxonomy::{CategoryNode, Taxonomy};

/// The number of posts filed directly under each category slug.
///
/// This is a raw tally: a post only counts towards the exact slug it names.
#[derive(Debug, Default, PartialEq, Eq, Clone, Deref)]
pub struct PostCounts(HashMap<String, usize>);

impl PostCounts {
    /// Tallies the given post categories.
    pub fn tally<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts = HashMap::new();

        for category in categories {
            *counts.entry(category.to_string()).or_insert(0) += 1;
        }

        Self(counts)
    }

    /// Returns the number of posts filed directly under the given slug.
    pub fn direct(&self, slug: &str) -> usize {
        self.0.get(slug).copied().unwrap_or(0)
    }
}

/// A category annotated with the number of posts filed under it or any of its
/// descendants.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct CountedCategory {
    pub name: String,
    pub slug: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CountedCategory>,
}

impl CountedCategory {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Builds a counted copy of the given categories.
///
/// Children are counted before their parent, and a parent's count is its
/// direct posts plus the counts of all of its children.
pub fn recompute_counts(nodes: &[CategoryNode], counts: &PostCounts) -> Vec<CountedCategory> {
    nodes
        .iter()
        .map(|node| {
            let children = recompute_counts(&node.children, counts);
            let child_count = children.iter().map(|child| child.count).sum::<usize>();

            CountedCategory {
                name: node.name.clone(),
                slug: node.slug.clone(),
                count: counts.direct(&node.slug) + child_count,
                children,
            }
        })
        .collect()
}

/// Returns the number of posts across all of the given top-level categories.
pub fn total_count(categories: &[CountedCategory]) -> usize {
    categories.iter().map(|category| category.count).sum()
}

impl Taxonomy {
    /// Returns a freshly counted copy of the taxonomy.
    pub fn counted(&self, counts: &PostCounts) -> Vec<CountedCategory> {
        recompute_counts(self.roots(), counts)
    }
}
