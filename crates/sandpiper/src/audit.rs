use std::fmt;

use crate::content::Post;
use crate::taxonomy::Taxonomy;

/// A problem with site content that does not prevent the site from building.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ContentIssue {
    /// The post is filed under a category that is not in the taxonomy.
    UnknownCategory { post: String, category: String },
    /// The post has no date, so it sorts after every dated post.
    UndatedPost { post: String },
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCategory { post, category } => write!(
                f,
                "post '{post}' is filed under unknown category '{category}'"
            ),
            Self::UndatedPost { post } => write!(f, "post '{post}' has no date"),
        }
    }
}

/// Returns the issues found in the given posts, in post order.
///
/// Posts without a category count as `uncategorized`, which is reported like
/// any other category when the taxonomy does not have it.
pub fn audit_posts(posts: &[Post], taxonomy: &Taxonomy) -> Vec<ContentIssue> {
    let mut issues = Vec::new();

    for post in posts {
        let category = post.category();
        if !taxonomy.contains(category) {
            issues.push(ContentIssue::UnknownCategory {
                post: post.slug.clone(),
                category: category.to_string(),
            });
        }

        if post.date.is_none() {
            issues.push(ContentIssue::UndatedPost {
                post: post.slug.clone(),
            });
        }
    }

    issues
}
