//! Catalog API client, error envelope, and data models.

pub mod client;
pub mod error;
pub mod models;

#[cfg(test)]
pub(crate) mod fixtures;

pub use client::{CatalogApi, CatalogClient, DEFAULT_PAGE_SIZE};
pub use error::{ApiError, ApiResult, Envelope, GENERIC_ERROR};
pub use models::{Dimensions, Meta, Product, ProductPage, Review, SortOrder};
