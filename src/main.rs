//! storefront - Product catalog browser CLI
//!
//! Lists, searches, sorts, and inspects products from a remote JSON catalog.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storefront::catalog::SortOption;
use storefront::commands::{
    BrowseCommand, CategoriesCommand, ListCommand, ListOptions, ListQuery, ProductCommand,
    ProductOptions,
};
use storefront::config::{Config, OutputFormat};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "storefront",
    version,
    about = "Browse a remote product catalog from the terminal",
    long_about = "Lists, searches, sorts, and inspects products from a DummyJSON-style catalog API."
)]
struct Cli {
    /// Catalog API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "STOREFRONT_PROXY")]
    proxy: Option<String>,

    /// Products per page
    #[arg(long, global = true)]
    page_size: Option<u32>,

    /// Retries for transient failures
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    #[command(alias = "ls")]
    List {
        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,

        /// Show one category
        #[arg(long, conflicts_with_all = ["search", "sort"])]
        category: Option<String>,

        /// Search products
        #[arg(short, long, conflicts_with = "sort")]
        search: Option<String>,

        /// Sort: title, lowest-price, highest-price, rating
        #[arg(long)]
        sort: Option<SortOption>,
    },

    /// List category names
    Categories,

    /// Show one product
    #[command(alias = "p")]
    Product {
        /// Product id
        id: u64,

        /// Image to show (1-based)
        #[arg(long)]
        image: Option<usize>,

        /// Include reviews
        #[arg(long)]
        reviews: bool,
    },

    /// Browse interactively
    #[command(alias = "b")]
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(page_size) = cli.page_size.filter(|&size| size > 0) {
        config.page_size = page_size;
    }
    if let Some(retries) = cli.retries {
        config.retries = retries;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::List { pages, category, search, sort } => {
            let query = category
                .map(ListQuery::Category)
                .or(search.map(ListQuery::Search))
                .or(sort.map(ListQuery::Sort));

            let cmd = ListCommand::new(config);
            let output = cmd.execute(&ListOptions { pages, query }).await?;
            println!("{}", output);
        }

        Commands::Categories => {
            let cmd = CategoriesCommand::new(config);
            let output = cmd.execute().await?;
            println!("{}", output);
        }

        Commands::Product { id, image, reviews } => {
            let cmd = ProductCommand::new(config);
            let output = cmd.execute(id, &ProductOptions { image, reviews }).await?;
            println!("{}", output);
        }

        Commands::Browse => {
            let cmd = BrowseCommand::new(config);
            cmd.execute().await?;
        }
    }

    Ok(())
}
