use std::cmp::Ordering;

use crate::content::Post;

/// Sorts posts by date, in descending order (newest to oldest).
///
/// Dates are compared as timestamps. Posts with the same date are ordered by
/// slug, and undated posts come last, also ordered by slug.
pub fn sort_posts_by_date(posts: Vec<Post>) -> Vec<Post> {
    let (mut sortable, mut not_sortable): (Vec<Post>, Vec<Post>) =
        posts.into_iter().partition(|post| post.date.is_some());

    sortable.sort_unstable_by(|a, b| match b.date.cmp(&a.date) {
        Ordering::Equal => a.slug.cmp(&b.slug),
        ord => ord,
    });

    not_sortable.sort_unstable_by(|a, b| a.slug.cmp(&b.slug));

    sortable.extend(not_sortable);
    sortable
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono_tz::Tz;
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_post(slug: &str, date: Option<&str>) -> Post {
        let date = date.map_or(String::new(), |date| format!("date: \"{date}\"\n"));
        let text = format!("---\ntitle: {slug}\n{date}---\n");

        Post::parse(&text, Path::new(&format!("_posts/{slug}.md")), Tz::UTC).unwrap()
    }

    #[test]
    fn test_sort_posts_by_date() {
        let posts = vec![
            make_post("hello-world", Some("2023-07-01")),
            make_post("undated-b", None),
            make_post("happy-new-year", Some("2024-01-01")),
            make_post("undated-a", None),
            make_post("year-in-review", Some("2023-12-31")),
        ];

        let sorted = sort_posts_by_date(posts)
            .into_iter()
            .map(|post| post.slug)
            .collect::<Vec<_>>();

        assert_eq!(
            sorted,
            vec![
                "happy-new-year",
                "year-in-review",
                "hello-world",
                "undated-a",
                "undated-b"
            ]
        );
    }

    #[test]
    fn test_sort_uses_timestamps_not_strings() {
        let posts = vec![
            make_post("evening-in-new-york", Some("2025-01-09T23:00:00-05:00")),
            make_post("early-in-london", Some("2025-01-10T01:00:00Z")),
        ];

        let sorted = sort_posts_by_date(posts)
            .into_iter()
            .map(|post| post.slug)
            .collect::<Vec<_>>();

        assert_eq!(sorted, vec!["evening-in-new-york", "early-in-london"]);
    }

    #[test]
    fn test_same_date_sorted_by_slug() {
        let posts = vec![
            make_post("b", Some("2024-01-01")),
            make_post("a", Some("2024-01-01")),
        ];

        let sorted = sort_posts_by_date(posts)
            .into_iter()
            .map(|post| post.slug)
            .collect::<Vec<_>>();

        assert_eq!(sorted, vec!["a", "b"]);
    }
}
