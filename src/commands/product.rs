//! Product detail command implementation.

use crate::api::{CatalogApi, CatalogClient};
use crate::catalog::DetailController;
use crate::config::{Config, OutputFormat};
use crate::format::Formatter;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Options for the `product` command.
#[derive(Debug, Clone, Default)]
pub struct ProductOptions {
    /// 1-based image to highlight; clamped to the gallery
    pub image: Option<usize>,
    pub reviews: bool,
}

/// Shows one product's detail view.
pub struct ProductCommand {
    config: Config,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches a product by id and returns formatted output.
    pub async fn execute(&self, id: u64, options: &ProductOptions) -> Result<String> {
        let client = CatalogClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(Arc::new(client), id, options).await
    }

    /// Fetches a product with a provided client (for testing).
    ///
    /// JSON output always succeeds with the `{ data, error }` envelope; other
    /// formats turn a failed load into an error.
    pub async fn execute_with_client<A: CatalogApi>(
        &self,
        api: Arc<A>,
        id: u64,
        options: &ProductOptions,
    ) -> Result<String> {
        info!("Looking up product: {}", id);

        let mut detail = DetailController::new(api);
        let loaded = detail.load(id).await;

        if self.config.format == OutputFormat::Json {
            return serde_json::to_string_pretty(&detail.envelope())
                .context("Failed to serialize product");
        }

        if !loaded {
            anyhow::bail!("{}", detail.error().unwrap_or(crate::api::GENERIC_ERROR));
        }

        if let Some(image) = options.image {
            detail.select_image(image.saturating_sub(1));
        }
        if options.reviews {
            detail.toggle_reviews();
        }

        let product = detail.product().context("Product missing after load")?;
        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_detail(product, detail.image_index(), detail.reviews_visible()))
    }
}
