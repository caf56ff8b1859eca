//! Output formatting for products (table, JSON, markdown, CSV).

use crate::api::{Product, Review};
use crate::config::OutputFormat;

const MAX_STARS: usize = 5;

/// Renders a 0-5 rating as stars, with a half star for fractions in `[0.25, 0.75)`.
pub fn stars(rating: f64) -> String {
    let rating = rating.clamp(0.0, MAX_STARS as f64);
    let full = rating.floor() as usize;
    let fraction = rating - full as f64;
    let half = (0.25..0.75).contains(&fraction);
    let empty = MAX_STARS - full - usize::from(half);

    let mut out = "★".repeat(full);
    if half {
        out.push('½');
    }
    out.push_str(&"☆".repeat(empty));
    out
}

/// Formats a price in dollars.
pub fn price(value: f64) -> String {
    format!("${:.2}", value)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// Formats products for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json(products),
            OutputFormat::Table => self.table_products(products),
            OutputFormat::Markdown => self.markdown_products(products),
            OutputFormat::Csv => self.csv_products(products),
        }
    }

    /// Formats the detail view of one product.
    ///
    /// `image_index` selects the carousel image; reviews are listed only when
    /// `show_reviews` is set.
    pub fn format_detail(
        &self,
        product: &Product,
        image_index: usize,
        show_reviews: bool,
    ) -> String {
        match self.format {
            OutputFormat::Json => self.json(product),
            OutputFormat::Table => self.table_detail(product, image_index, show_reviews),
            OutputFormat::Markdown => self.markdown_detail(product, image_index, show_reviews),
            OutputFormat::Csv => self.csv_products(std::slice::from_ref(product)),
        }
    }

    /// Formats a list of category names.
    pub fn format_categories(&self, categories: &[String]) -> String {
        match self.format {
            OutputFormat::Json => self.json(categories),
            OutputFormat::Markdown => {
                categories.iter().map(|c| format!("- {}", c)).collect::<Vec<_>>().join("\n")
            }
            OutputFormat::Csv => {
                let mut lines = vec!["category".to_string()];
                lines.extend(categories.iter().cloned());
                lines.join("\n")
            }
            OutputFormat::Table => {
                if categories.is_empty() {
                    "No categories found.".to_string()
                } else {
                    categories.join("\n")
                }
            }
        }
    }

    // JSON formatting

    fn json<T: serde::Serialize + ?Sized>(&self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
    }

    // Table formatting

    fn table_detail(&self, product: &Product, image_index: usize, show_reviews: bool) -> String {
        let mut lines = Vec::new();

        lines.push(format!("ID:       {}", product.id));
        lines.push(format!("Title:    {}", product.title));
        if let Some(brand) = &product.brand {
            lines.push(format!("Brand:    {}", brand));
        }
        lines.push(format!("Category: {}", product.category));

        match product.original_price() {
            Some(original) => lines.push(format!(
                "Price:    {} (was {}, -{:.0}%)",
                price(product.price),
                price(original),
                product.discount_percentage
            )),
            None => lines.push(format!("Price:    {}", price(product.price))),
        }

        lines.push(format!("Rating:   {} {:.2}/5", stars(product.rating), product.rating));
        lines.push(format!("Stock:    {} ({})", product.stock, product.availability_status));

        if !product.images.is_empty() {
            let index = image_index.min(product.images.len() - 1);
            lines.push(format!(
                "Image:    {}/{} {}",
                index + 1,
                product.images.len(),
                product.images[index]
            ));
        }

        if !product.description.is_empty() {
            lines.push(String::new());
            lines.push(product.description.clone());
        }

        let mut info = Vec::new();
        for (label, value) in [
            ("Warranty", &product.warranty_information),
            ("Shipping", &product.shipping_information),
            ("Returns", &product.return_policy),
        ] {
            if !value.is_empty() {
                info.push(format!("{}: {}", label, value));
            }
        }
        if !info.is_empty() {
            lines.push(String::new());
            lines.extend(info);
        }

        lines.push(String::new());
        if show_reviews {
            lines.push(format!("Reviews ({}):", product.reviews.len()));
            for review in &product.reviews {
                lines.push(self.table_review(review));
            }
        } else {
            lines.push(format!("Reviews: {} (hidden)", product.reviews.len()));
        }

        lines.join("\n")
    }

    fn table_review(&self, review: &Review) -> String {
        format!(
            "  {} {} ({})\n    {}",
            stars(review.rating),
            review.reviewer_name,
            review.display_date(),
            review.comment
        )
    }

    fn table_products(&self, products: &[Product]) -> String {
        let id_width = 5;
        let price_width = 10;
        let rating_width = 6;
        let brand_width = 16;
        let title_width = 45;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<id_width$}  {:<price_width$}  {:<rating_width$}  {:<brand_width$}  {}",
            "ID", "Price", "Rating", "Brand", "Title"
        ));
        lines.push(format!(
            "{:-<id_width$}  {:-<price_width$}  {:-<rating_width$}  {:-<brand_width$}  {:-<title_width$}",
            "", "", "", "", ""
        ));

        for product in products {
            lines.push(format!(
                "{:<id_width$}  {:>price_width$}  {:>rating_width$.2}  {:<brand_width$}  {}",
                product.id,
                price(product.price),
                product.rating,
                truncate(product.brand_name(), brand_width),
                truncate(&product.title, title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_detail(&self, product: &Product, image_index: usize, show_reviews: bool) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", product.title));
        lines.push(String::new());

        lines.push(format!("- **ID:** {}", product.id));
        if let Some(brand) = &product.brand {
            lines.push(format!("- **Brand:** {}", brand));
        }
        match product.original_price() {
            Some(original) => lines.push(format!(
                "- **Price:** {} ~~{}~~",
                price(product.price),
                price(original)
            )),
            None => lines.push(format!("- **Price:** {}", price(product.price))),
        }
        lines.push(format!("- **Rating:** {} ({:.2}/5)", stars(product.rating), product.rating));
        lines.push(format!("- **Availability:** {}", product.availability_status));

        if let Some(image) = product.images.get(image_index).or(product.images.last()) {
            lines.push(String::new());
            lines.push(format!("![{}]({})", product.title, image));
        }

        if !product.description.is_empty() {
            lines.push(String::new());
            lines.push(product.description.clone());
        }

        if show_reviews && !product.reviews.is_empty() {
            lines.push(String::new());
            lines.push("### Reviews".to_string());
            lines.push(String::new());
            for review in &product.reviews {
                lines.push(format!(
                    "- **{}** ({}) {}: {}",
                    review.reviewer_name,
                    review.display_date(),
                    stars(review.rating),
                    review.comment
                ));
            }
        }

        lines.join("\n")
    }

    fn markdown_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push("| ID | Price | Rating | Brand | Title |".to_string());
        lines.push("|----|-------|--------|-------|-------|".to_string());

        for product in products {
            lines.push(format!(
                "| {} | {} | {:.2} | {} | [{}]({}) |",
                product.id,
                price(product.price),
                product.rating,
                product.brand_name(),
                truncate(&product.title, 40),
                product.thumbnail
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "id,title,category,brand,price,discount_percentage,rating,stock,availability,thumbnail"
            .to_string()
    }

    fn csv_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for product in products {
            lines.push(format!(
                "{},{},{},{},{},{},{},{},{},{}",
                product.id,
                Self::csv_escape(&product.title),
                Self::csv_escape(&product.category),
                Self::csv_escape(product.brand_name()),
                product.price,
                product.discount_percentage,
                product.rating,
                product.stock,
                Self::csv_escape(&product.availability_status),
                product.thumbnail
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
