//! List and categories command implementations.

use crate::api::{CatalogApi, CatalogClient};
use crate::catalog::{
    ListController, NoopGate, ProductStore, QueryOutcome, SortOption, StartupGate, TerminalGate,
};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One query mode to apply before printing the list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListQuery {
    Category(String),
    Search(String),
    Sort(SortOption),
}

/// Options for the `list` command.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Pages to load (at least one)
    pub pages: u32,
    pub query: Option<ListQuery>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { pages: 1, query: None }
    }
}

/// Lists products, optionally narrowed by one query mode.
pub struct ListCommand {
    config: Config,
}

impl ListCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the listing and returns formatted output.
    pub async fn execute(&self, options: &ListOptions) -> Result<String> {
        let client = CatalogClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(Arc::new(client), &TerminalGate::new(), options).await
    }

    /// Executes the listing with a provided client (for testing).
    pub async fn execute_with_client<A: CatalogApi>(
        &self,
        api: Arc<A>,
        gate: &dyn StartupGate,
        options: &ListOptions,
    ) -> Result<String> {
        let mut store = ProductStore::new(Arc::clone(&api), self.config.page_size);
        store.initialize(gate).await;

        if let Some(err) = store.error() {
            warn!("Startup reported an error: {}", err);
        }

        let mut list = ListController::new(api, self.config.page_size);

        let outcome = match &options.query {
            None => QueryOutcome::Skipped,
            Some(ListQuery::Category(name)) => list.select_category(name).await,
            Some(ListQuery::Search(text)) => list.search(text).await,
            Some(ListQuery::Sort(option)) => list.select_sort(*option).await,
        };
        debug!("Query outcome: {:?}", outcome);

        if let Some(err) = list.error() {
            anyhow::bail!("{}", err);
        }
        if let Some(text) = list.no_results() {
            return Ok(format!("No results for '{}'.", text));
        }

        for _ in 1..options.pages.max(1) {
            match list.load_more(&mut store).await {
                QueryOutcome::Skipped => break,
                QueryOutcome::Failed => {
                    warn!("Stopped paging: {}", store.error().or(list.error()).unwrap_or_default());
                    break;
                }
                _ => {}
            }
        }

        let displayed = list.displayed(&store);
        if displayed.is_empty() {
            if let Some(err) = store.error() {
                anyhow::bail!("{}", err);
            }
        }

        info!("Showing {} products ({})", displayed.len(), list.mode());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_products(displayed))
    }
}

/// Prints the category names.
pub struct CategoriesCommand {
    config: Config,
}

impl CategoriesCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> Result<String> {
        let client = CatalogClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(Arc::new(client)).await
    }

    /// Executes with a provided client (for testing).
    pub async fn execute_with_client<A: CatalogApi>(&self, api: Arc<A>) -> Result<String> {
        let mut store = ProductStore::new(api, self.config.page_size);
        store.initialize(&NoopGate).await;

        if store.categories().is_empty() {
            if let Some(err) = store.error() {
                anyhow::bail!("Failed to fetch categories: {}", err);
            }
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_categories(store.categories()))
    }
}
