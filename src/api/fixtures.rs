//! In-memory `CatalogApi` used by unit tests.

use super::client::CatalogApi;
use super::error::{ApiError, ApiResult};
use super::models::{Product, ProductPage, SortOrder};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Builds a minimal product for fixtures.
pub fn product(id: u64, title: &str, price: f64) -> Product {
    Product {
        id,
        title: title.to_string(),
        price,
        category: "misc".to_string(),
        rating: 4.0,
        images: vec![
            format!("https://cdn.example.com/{}/1.png", id),
            format!("https://cdn.example.com/{}/2.png", id),
            format!("https://cdn.example.com/{}/3.png", id),
        ],
        ..Default::default()
    }
}

/// Builds `count` products with ids starting at `first_id`.
pub fn products(first_id: u64, count: u64) -> Vec<Product> {
    (first_id..first_id + count)
        .map(|id| product(id, &format!("Product {}", id), id as f64 * 1.5))
        .collect()
}

/// Canned catalog that records every call made against it.
#[derive(Default)]
pub struct FixtureApi {
    catalog: Vec<Product>,
    categories: Vec<String>,
    by_category: HashMap<String, Vec<Product>>,
    searches: HashMap<String, Vec<Product>>,
    failing: HashSet<&'static str>,
    failing_once: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<String>>,
}

impl FixtureApi {
    pub fn new(catalog: Vec<Product>) -> Self {
        Self { catalog, ..Default::default() }
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_category(mut self, name: &str, products: Vec<Product>) -> Self {
        self.by_category.insert(name.to_string(), products);
        self
    }

    pub fn with_search(mut self, query: &str, products: Vec<Product>) -> Self {
        self.searches.insert(query.to_string(), products);
        self
    }

    /// Makes every call to `operation` fail with a 500.
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Makes only the first call to `operation` fail.
    pub fn failing_once(self, operation: &'static str) -> Self {
        self.fail_next(operation);
        self
    }

    /// Makes the next call to `operation` fail with a 500.
    pub fn fail_next(&self, operation: &'static str) {
        self.failing_once.lock().unwrap().insert(operation);
    }

    /// Returns the calls made so far, oldest first.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, operation: &'static str, call: String) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        let once = self.failing_once.lock().unwrap().remove(operation);
        if once || self.failing.contains(operation) {
            return Err(ApiError::Service {
                status: 500,
                message: format!("{} failed", operation),
            });
        }
        Ok(())
    }

    fn page_of(&self, products: &[Product], page: u32, limit: u32) -> ProductPage {
        let start = (page as usize * limit as usize).min(products.len());
        let end = (start + limit as usize).min(products.len());
        ProductPage {
            products: products[start..end].to_vec(),
            total: products.len() as u32,
            skip: start as u32,
            limit,
        }
    }

    fn whole(products: Vec<Product>) -> ProductPage {
        let total = products.len() as u32;
        ProductPage { products, total, skip: 0, limit: total }
    }
}

#[async_trait]
impl CatalogApi for FixtureApi {
    async fn list_products(&self, page: u32, limit: u32) -> ApiResult<ProductPage> {
        self.record("list_products", format!("list_products({},{})", page, limit))?;
        Ok(self.page_of(&self.catalog, page, limit))
    }

    async fn list_categories(&self) -> ApiResult<Vec<String>> {
        self.record("list_categories", "list_categories".to_string())?;
        Ok(self.categories.clone())
    }

    async fn list_products_by_category(&self, category: &str) -> ApiResult<ProductPage> {
        self.record("list_products_by_category", format!("category({})", category))?;
        match self.by_category.get(category) {
            Some(products) => Ok(Self::whole(products.clone())),
            None => Err(ApiError::Service {
                status: 404,
                message: format!("Category '{}' not found", category),
            }),
        }
    }

    async fn search_products(&self, query: &str) -> ApiResult<ProductPage> {
        self.record("search_products", format!("search({})", query))?;
        Ok(Self::whole(self.searches.get(query).cloned().unwrap_or_default()))
    }

    async fn list_sorted_products(
        &self,
        sort_by: &str,
        order: SortOrder,
        page: u32,
        limit: u32,
    ) -> ApiResult<ProductPage> {
        self.record(
            "list_sorted_products",
            format!("sorted({},{},{},{})", sort_by, order, page, limit),
        )?;

        let mut sorted = self.catalog.clone();
        match sort_by {
            "price" => sorted.sort_by(|a, b| a.price.total_cmp(&b.price)),
            "rating" => sorted.sort_by(|a, b| a.rating.total_cmp(&b.rating)),
            _ => sorted.sort_by(|a, b| a.title.cmp(&b.title)),
        }
        if order == SortOrder::Desc {
            sorted.reverse();
        }

        Ok(self.page_of(&sorted, page, limit))
    }

    async fn get_product(&self, id: u64) -> ApiResult<Product> {
        self.record("get_product", format!("get_product({})", id))?;
        self.catalog.iter().find(|p| p.id == id).cloned().ok_or_else(|| ApiError::Service {
            status: 404,
            message: format!("Product with id '{}' not found", id),
        })
    }
}
