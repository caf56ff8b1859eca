//! Data models for catalog products, reviews, and paged responses.

use serde::{Deserialize, Serialize};

/// A catalog product as returned by the product API.
///
/// Fields the API omits for some products (brand, most notably) decode to
/// their defaults instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    /// Stable product identifier
    pub id: u64,
    /// Product title
    pub title: String,
    /// Long-form description
    pub description: String,
    /// Category slug (e.g. "smartphones")
    pub category: String,
    /// Current price in USD
    pub price: f64,
    /// Discount applied to the original price, in percent
    pub discount_percentage: f64,
    /// Average rating (0.0 - 5.0)
    pub rating: f64,
    /// Units in stock
    pub stock: u32,
    pub tags: Vec<String>,
    pub brand: Option<String>,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    /// Reviews in the order the API returned them
    pub reviews: Vec<Review>,
    pub return_policy: String,
    pub minimum_order_quantity: u32,
    pub meta: Meta,
    /// Gallery image URLs, in display order
    pub images: Vec<String>,
    pub thumbnail: String,
}

impl Product {
    /// Returns the price before the discount was applied, if discounted.
    pub fn original_price(&self) -> Option<f64> {
        if self.discount_percentage <= 0.0 || self.discount_percentage >= 100.0 {
            return None;
        }

        let original = self.price / (1.0 - self.discount_percentage / 100.0);
        Some((original * 100.0).round() / 100.0)
    }

    /// Returns the number of gallery images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Returns the brand, or an empty string for unbranded products.
    pub fn brand_name(&self) -> &str {
        self.brand.as_deref().unwrap_or("")
    }
}

/// Physical dimensions of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Bookkeeping metadata attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meta {
    /// ISO-8601 creation timestamp
    pub created_at: String,
    /// ISO-8601 last-update timestamp
    pub updated_at: String,
    pub barcode: String,
    pub qr_code: String,
}

/// A customer review nested under a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    /// Star rating (0 - 5)
    pub rating: f64,
    pub comment: String,
    /// ISO-8601 date the review was written
    pub date: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
}

impl Review {
    /// Returns the review date as `YYYY-MM-DD`, or the raw value if it does not parse.
    pub fn display_date(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.date)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| self.date.clone())
    }
}

/// Sort direction as transmitted in the `order` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page of products from any of the listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Total number of products matching the request upstream
    pub total: u32,
    pub skip: u32,
    pub limit: u32,
}

impl ProductPage {
    /// Returns true if more products exist beyond `loaded`.
    pub fn has_more(&self, loaded: usize) -> bool {
        loaded < self.total as usize
    }

    /// Returns true if the page carries no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
