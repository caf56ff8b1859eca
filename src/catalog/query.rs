//! Query mode selector and sort options for the product list.

use crate::api::SortOrder;
use serde::{Deserialize, Serialize};

/// User-facing sort choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Default catalog order; selecting it resets the list.
    Title,
    LowestPrice,
    HighestPrice,
    Rating,
}

impl SortOption {
    pub fn all() -> &'static [SortOption] {
        &[SortOption::Title, SortOption::LowestPrice, SortOption::HighestPrice, SortOption::Rating]
    }

    /// Field name sent as `sortBy`.
    pub fn field(&self) -> &'static str {
        match self {
            SortOption::Title => "title",
            SortOption::LowestPrice | SortOption::HighestPrice => "price",
            SortOption::Rating => "rating",
        }
    }

    /// Direction sent as `order`.
    pub fn order(&self) -> SortOrder {
        match self {
            SortOption::Title | SortOption::LowestPrice => SortOrder::Asc,
            SortOption::HighestPrice | SortOption::Rating => SortOrder::Desc,
        }
    }

    /// Returns true if selecting this option needs a request.
    pub fn is_remote(&self) -> bool {
        *self != SortOption::Title
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::Title => "Title",
            SortOption::LowestPrice => "Lowest Price",
            SortOption::HighestPrice => "Highest Price",
            SortOption::Rating => "Rating",
        }
    }
}

impl std::str::FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortOption::Title),
            "lowest-price" | "price-asc" | "lowest" => Ok(SortOption::LowestPrice),
            "highest-price" | "price-desc" | "highest" => Ok(SortOption::HighestPrice),
            "rating" => Ok(SortOption::Rating),
            _ => Err(format!(
                "Unknown sort: {}. Use: title, lowest-price, highest-price, rating",
                s
            )),
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SortOption::Title => "title",
            SortOption::LowestPrice => "lowest-price",
            SortOption::HighestPrice => "highest-price",
            SortOption::Rating => "rating",
        };
        f.write_str(name)
    }
}

/// The single selector governing what the product list shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryMode {
    /// The store's base collection.
    #[default]
    None,
    Category(String),
    Search(String),
    Sort(SortOption),
}

impl QueryMode {
    pub fn category(&self) -> Option<&str> {
        match self {
            QueryMode::Category(name) => Some(name),
            _ => None,
        }
    }

    pub fn search_text(&self) -> Option<&str> {
        match self {
            QueryMode::Search(text) => Some(text),
            _ => None,
        }
    }

    pub fn sort(&self) -> Option<SortOption> {
        match self {
            QueryMode::Sort(option) => Some(*option),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == QueryMode::None
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryMode::None => write!(f, "all products"),
            QueryMode::Category(name) => write!(f, "category '{}'", name),
            QueryMode::Search(text) => write!(f, "search '{}'", text),
            QueryMode::Sort(option) => write!(f, "sorted by {}", option.label()),
        }
    }
}
