//! storefront - Product catalog browser for a remote JSON product service
//!
//! An API client, a paged product store, and list/detail controllers that
//! derive what to show from one active query mode.

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod format;

pub use api::{ApiError, CatalogApi, CatalogClient, Envelope, Product, ProductPage, Review};
pub use catalog::{DetailController, ListController, ProductStore, QueryMode, SortOption};
pub use config::Config;
