//! List view controller: resolves the active query mode into the displayed list.

use super::query::{QueryMode, SortOption};
use super::store::{PageLoad, ProductStore};
use crate::api::{ApiResult, CatalogApi, Product, ProductPage, DEFAULT_PAGE_SIZE};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Nothing to do; no request was issued.
    Skipped,
    /// Back to the store's base collection.
    Reset,
    /// The displayed list was replaced with this many products.
    Applied(usize),
    /// This many products were appended to the displayed list.
    Appended(usize),
    /// The search succeeded with zero matches; the displayed list is unchanged.
    NoResults,
    /// The request failed; see `error()`.
    Failed,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
enum Request {
    Category(String),
    Search(String),
    Sort { option: SortOption, page: u32, limit: u32 },
}

/// A request issued by the controller, tagged with its generation.
///
/// Hand it back to [`ListController::apply`] together with the result of
/// [`PendingQuery::fetch`]. Only the most recently issued query is applied.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    generation: u64,
    request: Request,
}

impl PendingQuery {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Performs the request this query stands for.
    pub async fn fetch<A: CatalogApi + ?Sized>(&self, api: &A) -> ApiResult<ProductPage> {
        match &self.request {
            Request::Category(name) => api.list_products_by_category(name).await,
            Request::Search(text) => api.search_products(text).await,
            Request::Sort { option, page, limit } => {
                api.list_sorted_products(option.field(), option.order(), *page, *limit).await
            }
        }
    }
}

/// Either a request to run or an immediate outcome.
#[derive(Debug, Clone)]
pub enum Step {
    Request(PendingQuery),
    Done(QueryOutcome),
}

impl Step {
    pub fn into_request(self) -> Option<PendingQuery> {
        match self {
            Step::Request(query) => Some(query),
            Step::Done(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum View {
    Base,
    Fetched(Vec<Product>),
}

/// Derives the displayed product list from the store and one active query mode.
///
/// The controller never writes to the store's base collection. While no mode
/// is active it shows the base collection directly, so pages the store loads
/// later appear without copying.
pub struct ListController<A: CatalogApi> {
    api: Arc<A>,
    page_size: u32,
    mode: QueryMode,
    view: View,
    no_results: Option<String>,
    error: Option<String>,
    generation: u64,
    sort_next_page: Option<u32>,
}

impl<A: CatalogApi> ListController<A> {
    pub fn new(api: Arc<A>, page_size: u32) -> Self {
        let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };

        Self {
            api,
            page_size,
            mode: QueryMode::None,
            view: View::Base,
            no_results: None,
            error: None,
            generation: 0,
            sort_next_page: None,
        }
    }

    /// The list to render right now.
    pub fn displayed<'a>(&'a self, store: &'a ProductStore<A>) -> &'a [Product] {
        match &self.view {
            View::Base => store.products(),
            View::Fetched(products) => products,
        }
    }

    pub fn mode(&self) -> &QueryMode {
        &self.mode
    }

    /// Query text of the last search that matched nothing, while flagged.
    pub fn no_results(&self) -> Option<&str> {
        self.no_results.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Returns true if the displayed list is the store's base collection.
    pub fn is_showing_base(&self) -> bool {
        self.view == View::Base
    }

    /// Generation of the most recently issued request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Toggles a category: selecting the active one returns to all products.
    pub async fn select_category(&mut self, name: &str) -> QueryOutcome {
        let step = self.begin_category(name);
        self.run(step).await
    }

    /// Runs a free-text search. Blank input is ignored.
    pub async fn search(&mut self, text: &str) -> QueryOutcome {
        let step = self.begin_search(text);
        self.run(step).await
    }

    /// Applies a sort option. `Title` restores the base collection.
    pub async fn select_sort(&mut self, option: SortOption) -> QueryOutcome {
        let step = self.begin_sort(option);
        self.run(step).await
    }

    /// Loads the next page for the active mode.
    ///
    /// With no mode active this advances the store. A sorted view fetches its
    /// own next page. Category and search results arrive whole, so there is
    /// nothing more to load.
    pub async fn load_more(&mut self, store: &mut ProductStore<A>) -> QueryOutcome {
        match self.mode {
            QueryMode::None => match store.load_more().await {
                PageLoad::Loaded(count) => QueryOutcome::Appended(count),
                PageLoad::Exhausted => QueryOutcome::Skipped,
                PageLoad::Failed => QueryOutcome::Failed,
            },
            QueryMode::Sort(option) => match self.sort_next_page {
                Some(page) => {
                    let limit = self.page_size;
                    let step = self.issue(Request::Sort { option, page, limit });
                    self.run(step).await
                }
                None => {
                    debug!("No further sorted pages to load");
                    QueryOutcome::Skipped
                }
            },
            QueryMode::Category(_) | QueryMode::Search(_) => {
                debug!("Load more ignored while showing {}", self.mode);
                QueryOutcome::Skipped
            }
        }
    }

    /// Clears the search box: back to the base collection with no flags.
    pub fn clear_search(&mut self) {
        self.reset();
    }

    /// Starts a category selection without awaiting it.
    pub fn begin_category(&mut self, name: &str) -> Step {
        if self.mode.category() == Some(name) {
            info!("Deselecting category: {}", name);
            self.reset();
            return Step::Done(QueryOutcome::Reset);
        }

        self.mode = QueryMode::Category(name.to_string());
        self.issue(Request::Category(name.to_string()))
    }

    /// Starts a search without awaiting it.
    pub fn begin_search(&mut self, text: &str) -> Step {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank search");
            return Step::Done(QueryOutcome::Skipped);
        }

        self.mode = QueryMode::Search(text.to_string());
        self.issue(Request::Search(text.to_string()))
    }

    /// Starts a sort selection without awaiting it.
    pub fn begin_sort(&mut self, option: SortOption) -> Step {
        if !option.is_remote() {
            self.reset();
            return Step::Done(QueryOutcome::Reset);
        }

        self.mode = QueryMode::Sort(option);
        self.sort_next_page = None;
        self.issue(Request::Sort { option, page: 0, limit: self.page_size })
    }

    /// Applies the response to a previously issued query.
    pub fn apply(&mut self, query: PendingQuery, result: ApiResult<ProductPage>) -> QueryOutcome {
        if query.generation != self.generation {
            debug!(
                "Discarding stale response (generation {} < {})",
                query.generation, self.generation
            );
            return QueryOutcome::Stale;
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!("List request failed: {}", err);
                self.error = Some(err.message());
                return QueryOutcome::Failed;
            }
        };

        match query.request {
            Request::Search(text) if page.is_empty() => {
                info!("No results for '{}'", text);
                self.no_results = Some(text);
                QueryOutcome::NoResults
            }
            Request::Sort { page: number, .. } if number > 0 => {
                let count = page.products.len();
                let total = page.total as usize;
                if let View::Fetched(products) = &mut self.view {
                    products.extend(page.products);
                } else {
                    self.view = View::Fetched(page.products);
                }
                let loaded = self.fetched_len();
                self.sort_next_page = (loaded < total).then_some(number + 1);
                QueryOutcome::Appended(count)
            }
            request => {
                let count = page.products.len();
                if matches!(request, Request::Sort { .. }) {
                    self.sort_next_page = page.has_more(count).then_some(1);
                }
                info!("Showing {} products for {}", count, self.mode);
                self.view = View::Fetched(page.products);
                QueryOutcome::Applied(count)
            }
        }
    }

    fn fetched_len(&self) -> usize {
        match &self.view {
            View::Base => 0,
            View::Fetched(products) => products.len(),
        }
    }

    async fn run(&mut self, step: Step) -> QueryOutcome {
        match step {
            Step::Done(outcome) => outcome,
            Step::Request(query) => {
                let api = Arc::clone(&self.api);
                let result = query.fetch(api.as_ref()).await;
                self.apply(query, result)
            }
        }
    }

    /// Tags a new request, invalidating any still in flight.
    fn issue(&mut self, request: Request) -> Step {
        self.generation += 1;
        self.no_results = None;
        self.error = None;

        Step::Request(PendingQuery { generation: self.generation, request })
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.mode = QueryMode::None;
        self.view = View::Base;
        self.no_results = None;
        self.error = None;
        self.sort_next_page = None;
    }
}
