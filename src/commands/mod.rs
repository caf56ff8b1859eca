//! CLI command implementations.

pub mod browse;
pub mod list;
pub mod product;

pub use browse::{BrowseAction, BrowseCommand, BrowseSession};
pub use list::{CategoriesCommand, ListCommand, ListOptions, ListQuery};
pub use product::{ProductCommand, ProductOptions};
