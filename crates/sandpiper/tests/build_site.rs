use std::fs;
use std::path::Path;

use indoc::indoc;
use pretty_assertions::assert_eq;
use sandpiper::{ContentIssue, Site};

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn make_site_root() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    let path = root.path();

    write(
        path,
        "sandpiper.toml",
        indoc! {r#"
            base_url = "https://blog.example.com"
            title = "Market Notes"
            timezone = "Asia/Seoul"

            [feed]
            limit = 2
        "#},
    );

    write(
        path,
        "data/categories.json",
        indoc! {r#"
            [
              {
                "name": "Economy",
                "slug": "economy",
                "children": [
                  { "name": "Stocks", "slug": "stocks" },
                  { "name": "Crypto", "slug": "crypto" }
                ]
              },
              { "name": "Daily", "slug": "daily" }
            ]
        "#},
    );

    write(
        path,
        "_posts/kospi-weekly.md",
        indoc! {"
            ---
            title: KOSPI Weekly
            date: 2024-03-08 18:00:00
            excerpt: Semiconductors led the index.
            category: stocks
            ---
            The index closed higher.
        "},
    );
    write(
        path,
        "_posts/bitcoin-halving.md",
        indoc! {r#"
            +++
            title = "Bitcoin Halving"
            date = 2024-04-20T09:00:00+09:00
            excerpt = "Block rewards were cut."
            category = "crypto"
            +++
            Miners adjusted.
        "#},
    );
    write(
        path,
        "_posts/morning-walk.md",
        indoc! {"
            ---
            title: Morning Walk
            excerpt: A slow start.
            category: dialy
            ---
            Coffee first.
        "},
    );
    write(path, "_posts/.draft.md", "not a post");
    write(path, "_posts/notes.txt", "not a post either");

    write(
        path,
        "_pages/about.md",
        indoc! {"
            ---
            title: About
            ---
            Written in Seoul.
        "},
    );

    root
}

#[test]
fn test_load_site() {
    let root = make_site_root();

    let site = Site::load(root.path()).unwrap();

    assert_eq!(
        site.posts()
            .iter()
            .map(|post| post.slug.as_str())
            .collect::<Vec<_>>(),
        vec!["bitcoin-halving", "kospi-weekly", "morning-walk"]
    );
    assert_eq!(
        site.posts()
            .by_slug("kospi-weekly")
            .and_then(|post| post.date)
            .map(|date| date.to_rfc3339()),
        Some("2024-03-08T18:00:00+09:00".to_string())
    );
    assert_eq!(site.pages().len(), 1);
    assert_eq!(
        site.issues(),
        vec![
            ContentIssue::UnknownCategory {
                post: "morning-walk".into(),
                category: "dialy".into(),
            },
            ContentIssue::UndatedPost {
                post: "morning-walk".into(),
            },
        ]
    );
}

#[test]
fn test_category_queries() {
    let root = make_site_root();
    let site = Site::load(root.path()).unwrap();

    let slugs = |slug: &str| {
        site.posts_by_category(slug)
            .into_iter()
            .map(|post| post.slug.clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(slugs("economy"), vec!["bitcoin-halving", "kospi-weekly"]);
    assert_eq!(slugs("crypto"), vec!["bitcoin-halving"]);
    assert_eq!(slugs("daily"), Vec::<String>::new());
    assert_eq!(slugs("dialy"), vec!["morning-walk"]);

    let categories = site.categories();
    assert_eq!(
        categories
            .iter()
            .map(|category| (category.slug.as_str(), category.count))
            .collect::<Vec<_>>(),
        vec![("economy", 2), ("daily", 0)]
    );
}

#[test]
fn test_build_site() {
    let root = make_site_root();
    let site = Site::load(root.path()).unwrap();

    let output_path = site.build().unwrap();

    assert_eq!(output_path, root.path().join("public"));

    for path in [
        "index.html",
        "posts/kospi-weekly/index.html",
        "posts/bitcoin-halving/index.html",
        "posts/morning-walk/index.html",
        "page-info/about/index.html",
        "category/economy/index.html",
        "category/stocks/index.html",
        "category/crypto/index.html",
        "category/daily/index.html",
        "search/index.html",
        "rss.xml",
        "sitemap.xml",
        "search-index.json",
        "categories.json",
    ] {
        assert!(output_path.join(path).is_file(), "missing {path}");
    }

    let read = |path: &str| fs::read_to_string(output_path.join(path)).unwrap();

    let feed = read("rss.xml");
    assert_eq!(feed.matches("<item>").count(), 2);
    assert!(feed.contains("<link>https://blog.example.com/posts/bitcoin-halving/</link>"));
    assert!(feed.contains("<pubDate>Sat, 20 Apr 2024 09:00:00 +0900</pubDate>"));

    let sitemap = read("sitemap.xml");
    assert!(sitemap.contains("<loc>https://blog.example.com/category/economy/</loc>"));
    assert!(!sitemap.contains("<loc>https://blog.example.com/category/daily/</loc>"));

    let daily = read("category/daily/index.html");
    assert!(daily.contains("There are no posts in this category yet."));

    let categories: serde_json::Value = serde_json::from_str(&read("categories.json")).unwrap();
    assert_eq!(categories[0]["count"], 2);
    assert_eq!(categories[0]["children"][1]["slug"], "crypto");
    assert_eq!(categories[1].get("children"), None);
}

#[test]
fn test_missing_config_is_an_error() {
    let root = tempfile::tempdir().unwrap();

    assert!(Site::load(root.path()).is_err());
}
