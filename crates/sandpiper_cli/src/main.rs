use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sandpiper::taxonomy::{total_count, CountedCategory};
use sandpiper::{Site, SiteConfig};
use tracing::info;

/// Builds and previews a blog with a hierarchical category taxonomy.
#[derive(Parser)]
#[command(name = "sandpiper", version, about)]
struct Cli {
    /// The site root, containing `sandpiper.toml`
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the whole site to disk
    Build {
        /// Output directory, instead of the configured one
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the site's base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Render the site into memory and serve it locally
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Report content issues such as unknown categories and undated posts
    Check {
        /// Fail when any issue is found
        #[arg(long)]
        strict: bool,
    },
    /// Print the category tree with post counts
    Categories,
    /// Print the posts matching a query
    Search {
        query: String,
    },
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn load_config(root: &Path) -> Result<SiteConfig> {
    SiteConfig::load(root).with_context(|| format!("failed to load config from '{}'", root.display()))
}

fn load_site(root: &Path, config: SiteConfig) -> Result<Site> {
    Site::load_with_config(root, config)
        .with_context(|| format!("failed to load site from '{}'", root.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = cli.root.as_path();

    match cli.command {
        Command::Build { output, base_url } => {
            let mut config = load_config(root)?;
            if let Some(base_url) = base_url {
                config.set_base_url(base_url).context("invalid --base-url")?;
            }
            if let Some(output) = output {
                config.output_dir = std::env::current_dir()?.join(output);
            }

            let site = load_site(root, config)?;
            let output_path = site.build().context("failed to build site")?;

            info!("built {} posts to '{}'", site.posts().len(), output_path.display());
        }
        Command::Serve { port } => {
            let site = load_site(root, load_config(root)?)?;

            site.serve(port).await.context("failed to serve site")?;
        }
        Command::Check { strict } => {
            let site = load_site(root, load_config(root)?)?;
            let issues = site.issues();

            for issue in &issues {
                println!("warning: {issue}");
            }

            if strict && !issues.is_empty() {
                bail!("found {} content issues", issues.len());
            }

            println!(
                "checked {} posts and {} pages",
                site.posts().len(),
                site.pages().len()
            );
        }
        Command::Categories => {
            let site = load_site(root, load_config(root)?)?;
            let categories = site.categories();

            print!("{}", format_category_tree(&categories));
            println!("total: {}", total_count(&categories));
        }
        Command::Search { query } => {
            let site = load_site(root, load_config(root)?)?;

            for post in site.search(&query) {
                println!("{}\t{}", post.slug, post.meta.title);
            }
        }
    }

    Ok(())
}

fn format_category_tree(categories: &[CountedCategory]) -> String {
    fn write_level(categories: &[CountedCategory], depth: usize, output: &mut String) {
        for category in categories {
            output.push_str(&format!(
                "{}{} [{}] ({})\n",
                "  ".repeat(depth),
                category.name,
                category.slug,
                category.count
            ));
            write_level(&category.children, depth + 1, output);
        }
    }

    let mut output = String::new();
    write_level(categories, 0, &mut output);
    output
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_build_command_parsing() {
        let cli = Cli::parse_from(["sandpiper", "build", "--output", "dist"]);

        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Command::Build { output, base_url } => {
                assert_eq!(output, Some(PathBuf::from("dist")));
                assert_eq!(base_url, None);
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_serve_command_parsing() {
        let cli = Cli::parse_from(["sandpiper", "--root", "blog", "serve", "--port", "8080"]);

        assert_eq!(cli.root, PathBuf::from("blog"));
        match cli.command {
            Command::Serve { port } => assert_eq!(port, 8080),
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_check_and_search_parsing() {
        let cli = Cli::parse_from(["sandpiper", "-vv", "check", "--strict"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Check { strict: true }));

        let cli = Cli::parse_from(["sandpiper", "search", "rate cut"]);
        assert!(matches!(cli.command, Command::Search { query } if query == "rate cut"));
    }

    #[test]
    fn test_format_category_tree() {
        let categories = vec![
            CountedCategory {
                name: "Economy".into(),
                slug: "economy".into(),
                count: 2,
                children: vec![CountedCategory {
                    name: "Stocks".into(),
                    slug: "stocks".into(),
                    count: 2,
                    children: vec![],
                }],
            },
            CountedCategory {
                name: "Daily".into(),
                slug: "daily".into(),
                count: 0,
                children: vec![],
            },
        ];

        assert_eq!(
            format_category_tree(&categories),
            indoc! {"
                Economy [economy] (2)
                  Stocks [stocks] (2)
                Daily [daily] (0)
            "}
        );
    }
}
