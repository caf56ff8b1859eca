//! Process-wide product store: base collection, categories, and pagination.

use super::gate::StartupGate;
use crate::api::{ApiResult, CatalogApi, Product, ProductPage, DEFAULT_PAGE_SIZE};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of asking the store for another page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    /// The API's reported total was already reached; nothing was requested.
    Exhausted,
    /// The page arrived and this many products were appended.
    Loaded(usize),
    /// The request failed; the error field holds the message.
    Failed,
}

/// Owns the base product collection and drives its population.
///
/// The base collection only ever grows by appending pages in arrival order.
/// Filtering, sorting, and search are derived elsewhere and never write back.
pub struct ProductStore<A: CatalogApi> {
    api: Arc<A>,
    page_size: u32,
    products: Vec<Product>,
    categories: Vec<String>,
    next_page: u32,
    total: Option<u32>,
    error: Option<String>,
    ready: bool,
}

impl<A: CatalogApi> ProductStore<A> {
    /// Creates an empty, not-yet-ready store.
    pub fn new(api: Arc<A>, page_size: u32) -> Self {
        let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };

        Self {
            api,
            page_size,
            products: Vec::new(),
            categories: Vec::new(),
            next_page: 0,
            total: None,
            error: None,
            ready: false,
        }
    }

    /// Runs the startup sequence: categories and the first page, concurrently.
    ///
    /// Readiness flips once both requests have settled, whether or not they
    /// succeeded. Later calls are no-ops.
    pub async fn initialize(&mut self, gate: &dyn StartupGate) {
        if self.ready {
            debug!("Store already initialized");
            return;
        }

        gate.hold();

        let (categories, page) = tokio::join!(
            self.api.list_categories(),
            self.api.list_products(self.next_page, self.page_size)
        );

        match categories {
            Ok(categories) => {
                debug!("Loaded {} categories", categories.len());
                self.categories = categories;
            }
            Err(err) => {
                warn!("Failed to fetch categories: {}", err);
                self.error = Some(err.message());
            }
        }

        self.apply_page(page);
        self.ready = true;

        info!("Store ready with {} products", self.products.len());
        gate.release();
    }

    /// Fetches the next page and appends it.
    ///
    /// Does nothing once the API's reported total has been reached. A failed
    /// page is requested again on the next call.
    pub async fn load_more(&mut self) -> PageLoad {
        if !self.has_more() {
            debug!("All {} products loaded", self.products.len());
            return PageLoad::Exhausted;
        }

        let result = self.api.list_products(self.next_page, self.page_size).await;
        self.apply_page(result)
    }

    fn apply_page(&mut self, result: ApiResult<ProductPage>) -> PageLoad {
        match result {
            Ok(page) => {
                let count = page.products.len();
                debug!(
                    "Page {} returned {} products (total {})",
                    self.next_page, count, page.total
                );

                self.next_page += 1;
                self.total = Some(page.total);
                self.products.extend(page.products);
                PageLoad::Loaded(count)
            }
            Err(err) => {
                warn!("Failed to fetch page {}: {}", self.next_page, err);
                self.error = Some(err.message());
                PageLoad::Failed
            }
        }
    }

    /// Clears the last error. Successful calls never do this on their own.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Base collection in arrival order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Zero-based index of the next page to request; moves only on success.
    pub fn page(&self) -> u32 {
        self.next_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Total reported by the most recent successful page.
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    /// Returns true while the API may have unseen products.
    pub fn has_more(&self) -> bool {
        match self.total {
            Some(total) => self.products.len() < total as usize,
            None => true,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Shared handle to the API this store fetches from.
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }
}
