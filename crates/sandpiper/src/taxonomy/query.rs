use crate::taxonomy::{PostCounts, Taxonomy};

/// An item that is filed under a single category.
pub trait Categorized {
    /// Returns the slug of the category this item is filed under.
    fn category(&self) -> &str;
}

/// Returns the posts that belong to the category with the given slug,
/// including the posts of all of its subcategories.
///
/// A slug that is not in the taxonomy only matches posts filed under that
/// exact slug. The order of `posts` is preserved.
pub fn posts_by_category<'p, P>(
    requested_slug: &str,
    posts: &'p [P],
    taxonomy: &Taxonomy,
) -> Vec<&'p P>
where
    P: Categorized,
{
    let target_slugs = taxonomy.resolve_slugs(requested_slug);

    posts
        .iter()
        .filter(|post| target_slugs.contains(post.category()))
        .collect()
}

/// Tallies the categories of the given posts.
pub fn tally_categories<P: Categorized>(posts: &[P]) -> PostCounts {
    PostCounts::tally(posts.iter().map(Categorized::category))
}
