mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "herblift-cli")]
#[command(about = "Supplement search over the eBay Browse API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search and print the response JSON
    Search {
        /// Free-text query; the category's default phrase when omitted
        #[arg(long)]
        query: Option<String>,

        /// Category key (vitamins, protein, minerals, ...)
        #[arg(long = "type", value_name = "CATEGORY")]
        category: Option<String>,

        #[arg(long)]
        brand: Option<String>,

        /// Pass `new` to restrict to new-condition listings
        #[arg(long)]
        condition: Option<String>,

        /// Page size, 1-200
        #[arg(long)]
        limit: Option<String>,

        /// Offset cursor from a previous response's `next`
        #[arg(long)]
        offset: Option<String>,
    },
    /// List catalog categories and their rules
    Categories {
        /// YAML catalog to load instead of the built-in one
        #[arg(long, env = "HERBLIFT_CATALOG_PATH")]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // before clap parses: `.env` feeds `HERBLIFT_CATALOG_PATH` and the log level
    dotenvy::dotenv().ok();
    // stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(|key| std::env::var(key).ok())?)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Search {
            query,
            category,
            brand,
            condition,
            limit,
            offset,
        }) => {
            let params = commands::SearchArgs {
                query,
                category,
                brand,
                condition,
                limit,
                offset,
            };
            commands::run_search(&params).await?;
        }
        Some(Commands::Categories { catalog }) => {
            commands::run_categories(catalog.as_deref())?;
        }
        None => println!("herblift-cli: try `herblift-cli --help`"),
    }

    Ok(())
}

/// `RUST_LOG` if set, else `HERBLIFT_LOG_LEVEL`, else `info`.
fn env_filter(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<EnvFilter> {
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let directives = non_blank("RUST_LOG")
        .or_else(|| non_blank("HERBLIFT_LOG_LEVEL"))
        .unwrap_or_else(|| "info".to_owned());
    Ok(EnvFilter::try_new(directives)?)
}
