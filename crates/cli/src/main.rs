mod render;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_core::{
    load_config_or_default, metrics, validate_config, CatalogClient, Config, CoverSize,
    SearchCriteria, DEFAULT_POPULAR_COUNT, DEFAULT_SEARCH_LIMIT,
};

/// Config file picked up from the working directory when none is given
const DEFAULT_CONFIG_FILE: &str = "bookshelf.toml";

/// Log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "info";

/// Search the Open Library catalog from the terminal.
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "BOOKSHELF_CONFIG")]
    config: Option<PathBuf>,

    /// Print records as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Print Prometheus metrics after the command
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search by title, author or subject
    Search {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(
            long,
            default_value_t = DEFAULT_SEARCH_LIMIT,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show a selection of well-known books
    Popular {
        #[arg(long, default_value_t = DEFAULT_POPULAR_COUNT)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Show the detail page of one work
    Details {
        /// Work id or key (OL45883W, /works/OL45883W)
        id: String,
    },
    /// Print the cover image URL for a cover id
    Cover {
        #[arg(allow_hyphen_values = true)]
        id: i64,
        /// S, M or L; anything else means S
        #[arg(long, default_value = "S")]
        size: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so stdout stays clean for records
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref())?;
    validate_config(&config).context("Configuration validation failed")?;

    let client = CatalogClient::new(&config.catalog, &config.cache)
        .context("Failed to create catalog client")?;

    let output = match cli.command {
        Command::Search {
            title,
            author,
            subject,
            limit,
            offset,
        } => {
            let criteria = SearchCriteria {
                title,
                author,
                subject,
            };
            if !criteria.has_any() {
                bail!("Enter a title, author or subject to search");
            }
            let result = client.search(&criteria, limit, offset).await;
            if cli.json {
                serde_json::to_string_pretty(&result)?
            } else {
                render::search_page(&client, &result, offset as usize)
            }
        }
        Command::Popular { count, offset } => {
            let result = client.get_popular(count, offset).await;
            if cli.json {
                serde_json::to_string_pretty(&result)?
            } else {
                render::search_page(&client, &result, offset)
            }
        }
        Command::Details { id } => {
            let detail = client
                .get_details(&id)
                .await
                .with_context(|| format!("Could not load details for {}", id))?;
            if cli.json {
                serde_json::to_string_pretty(&detail)?
            } else {
                render::detail_page(&client, &detail)
            }
        }
        Command::Cover { id, size } => client
            .cover_url(Some(id), CoverSize::from_str_lossy(&size))
            .unwrap_or_else(|| "no cover".to_string()),
    };

    println!("{}", output);

    if cli.metrics {
        print!("{}", gather_metrics()?);
    }

    Ok(())
}

/// Explicit path must exist; otherwise use `bookshelf.toml` when present.
/// `BOOKSHELF_` environment overrides apply either way.
fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let path = explicit.or_else(|| default_path.exists().then_some(default_path));

    match path {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => debug!("No config file, using defaults and environment"),
    }

    load_config_or_default(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {:?}", path),
        None => "Failed to load config from environment".to_string(),
    })
}

fn gather_metrics() -> Result<String> {
    let registry = Registry::new();
    for metric in metrics::all_metrics() {
        registry
            .register(metric)
            .context("Failed to register metric")?;
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_defaults() {
        let cli = Cli::try_parse_from(["bookshelf", "search", "--title", "Dune"]).unwrap();
        match cli.command {
            Command::Search {
                title,
                limit,
                offset,
                ..
            } => {
                assert_eq!(title.as_deref(), Some("Dune"));
                assert_eq!(limit, 25);
                assert_eq!(offset, 0);
            }
            other => panic!("Expected search, got {:?}", other),
        }
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_cover_accepts_sentinel_and_any_size() {
        let cli = Cli::try_parse_from(["bookshelf", "cover", "-1", "--size", "X"]).unwrap();
        match cli.command {
            Command::Cover { id, size } => {
                assert_eq!(id, -1);
                assert_eq!(size, "X");
            }
            other => panic!("Expected cover, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_rejects_zero_limit() {
        let zero = Cli::try_parse_from(["bookshelf", "search", "--title", "Dune", "--limit", "0"]);
        assert!(zero.is_err());

        let cli =
            Cli::try_parse_from(["bookshelf", "search", "--title", "Dune", "--limit", "1"]).unwrap();
        assert!(matches!(cli.command, Command::Search { limit: 1, .. }));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        assert!(resolve_config(Some(Path::new("/nonexistent/bookshelf.toml"))).is_err());
    }
}
