//! Interactive browse session over stdin.

use crate::api::{CatalogApi, CatalogClient};
use crate::catalog::{
    DetailController, ListController, ProductStore, QueryOutcome, SortOption, StartupGate,
    TerminalGate,
};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  more              load the next page
  search <text>     search products
  clear             clear the search and show all products
  category <name>   filter by category (again to deselect)
  sort <option>     title, lowest-price, highest-price, rating
  open <id>         show product details
  next / prev       move through the open product's images
  reviews           show or hide the open product's reviews
  categories        list category names
  help              show this help
  quit              leave";

const NO_PRODUCT: &str = "No product open. Use 'open <id>' first.";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseAction {
    More,
    Search(String),
    Clear,
    Category(String),
    Sort(SortOption),
    Open(u64),
    Next,
    Prev,
    Reviews,
    Categories,
    Help,
    Quit,
}

impl FromStr for BrowseAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "more" | "m" => Ok(BrowseAction::More),
            "search" | "s" => Ok(BrowseAction::Search(arg.to_string())),
            "clear" => Ok(BrowseAction::Clear),
            "category" | "c" if !arg.is_empty() => Ok(BrowseAction::Category(arg.to_string())),
            "category" | "c" => Err("Usage: category <name>".to_string()),
            "sort" => arg.parse().map(BrowseAction::Sort),
            "open" | "o" => arg
                .parse()
                .map(BrowseAction::Open)
                .map_err(|_| format!("Usage: open <id> (got '{}')", arg)),
            "next" | "n" => Ok(BrowseAction::Next),
            "prev" | "p" => Ok(BrowseAction::Prev),
            "reviews" | "r" => Ok(BrowseAction::Reviews),
            "categories" => Ok(BrowseAction::Categories),
            "help" | "?" => Ok(BrowseAction::Help),
            "quit" | "exit" | "q" => Ok(BrowseAction::Quit),
            _ => Err(format!("Unknown command: {}. Type 'help' for commands.", command)),
        }
    }
}

/// Store plus both controllers, driven one action at a time.
pub struct BrowseSession<A: CatalogApi> {
    store: ProductStore<A>,
    list: ListController<A>,
    detail: DetailController<A>,
    formatter: Formatter,
}

impl<A: CatalogApi> BrowseSession<A> {
    /// Initializes the store behind the gate and returns a ready session.
    pub async fn start(api: Arc<A>, config: &Config, gate: &dyn StartupGate) -> Self {
        let mut store = ProductStore::new(Arc::clone(&api), config.page_size);
        store.initialize(gate).await;

        Self {
            store,
            list: ListController::new(Arc::clone(&api), config.page_size),
            detail: DetailController::new(api),
            formatter: Formatter::new(config.format),
        }
    }

    pub fn store(&self) -> &ProductStore<A> {
        &self.store
    }

    pub fn list(&self) -> &ListController<A> {
        &self.list
    }

    pub fn detail(&self) -> &DetailController<A> {
        &self.detail
    }

    /// Runs one action and returns what to print.
    pub async fn handle(&mut self, action: BrowseAction) -> String {
        debug!("Browse action: {:?}", action);

        match action {
            BrowseAction::More => {
                self.store.clear_error();
                if self.list.load_more(&mut self.store).await == QueryOutcome::Skipped {
                    return format!("Nothing more to load for {}.", self.list.mode());
                }
                self.render_list()
            }
            BrowseAction::Search(text) => {
                self.list.search(&text).await;
                self.render_list()
            }
            BrowseAction::Clear => {
                self.list.clear_search();
                self.render_list()
            }
            BrowseAction::Category(name) => {
                self.list.select_category(&name).await;
                self.render_list()
            }
            BrowseAction::Sort(option) => {
                self.list.select_sort(option).await;
                self.render_list()
            }
            BrowseAction::Open(id) => {
                self.detail.load(id).await;
                self.render_detail()
            }
            BrowseAction::Next => {
                self.detail.next_image();
                self.render_detail()
            }
            BrowseAction::Prev => {
                self.detail.previous_image();
                self.render_detail()
            }
            BrowseAction::Reviews => {
                if self.detail.product().is_some() {
                    self.detail.toggle_reviews();
                }
                self.render_detail()
            }
            BrowseAction::Categories => self.formatter.format_categories(self.store.categories()),
            BrowseAction::Help => HELP.to_string(),
            BrowseAction::Quit => String::new(),
        }
    }

    /// Renders the displayed list with its mode, notices, and errors.
    pub fn render_list(&self) -> String {
        let displayed = self.list.displayed(&self.store);

        let mut lines = vec![
            format!("Showing {} ({} products)", self.list.mode(), displayed.len()),
            self.formatter.format_products(displayed),
        ];

        if let Some(text) = self.list.no_results() {
            lines.push(format!("No results for '{}'.", text));
        }
        if let Some(err) = self.list.error().or(self.store.error()) {
            lines.push(format!("Error: {}", err));
        }

        lines.join("\n")
    }

    fn render_detail(&self) -> String {
        match self.detail.product() {
            Some(product) => self.formatter.format_detail(
                product,
                self.detail.image_index(),
                self.detail.reviews_visible(),
            ),
            None => match self.detail.error() {
                Some(err) => format!("Error: {}", err),
                None => NO_PRODUCT.to_string(),
            },
        }
    }
}

/// Runs the interactive browse loop.
pub struct BrowseCommand {
    config: Config,
}

impl BrowseCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Browses the live catalog on stdin/stdout.
    pub async fn execute(&self) -> Result<()> {
        let client = CatalogClient::new(&self.config).context("Failed to create HTTP client")?;
        let input = BufReader::new(tokio::io::stdin());
        let output = tokio::io::stdout();

        self.execute_with_client(Arc::new(client), &TerminalGate::new(), input, output).await
    }

    /// Runs the loop over the given streams (for testing).
    pub async fn execute_with_client<A, R, W>(
        &self,
        api: Arc<A>,
        gate: &dyn StartupGate,
        input: R,
        mut output: W,
    ) -> Result<()>
    where
        A: CatalogApi,
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut session = BrowseSession::start(api, &self.config, gate).await;
        write_block(&mut output, &session.render_list()).await?;

        let mut lines = input.lines();
        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await.context("Failed to read input")? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let text = match line.parse::<BrowseAction>() {
                Ok(BrowseAction::Quit) => break,
                Ok(action) => session.handle(action).await,
                Err(message) => message,
            };
            write_block(&mut output, &text).await?;
        }

        output.write_all(b"\n").await?;
        output.flush().await?;
        Ok(())
    }
}

async fn write_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    Ok(())
}
