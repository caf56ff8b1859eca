//! Detail view controller: one product, its image carousel, and reviews.

use crate::api::{CatalogApi, Envelope, Product};
use std::sync::Arc;
use tracing::{debug, warn};

/// Holds a single product for the detail screen.
///
/// Independent of the store and the list controller.
pub struct DetailController<A: CatalogApi> {
    api: Arc<A>,
    product: Option<Product>,
    image_index: usize,
    reviews_visible: bool,
    error: Option<String>,
}

impl<A: CatalogApi> DetailController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            product: None,
            image_index: 0,
            reviews_visible: false,
            error: None,
        }
    }

    /// Fetches a product, resetting the carousel to the first image and
    /// hiding reviews.
    ///
    /// Returns true if the product was loaded. Loads are serialized by the
    /// exclusive borrow, so a response always belongs to the latest id.
    pub async fn load(&mut self, id: u64) -> bool {
        self.product = None;
        self.error = None;
        self.image_index = 0;
        self.reviews_visible = false;

        let result = self.api.get_product(id).await;
        match result {
            Ok(product) => {
                debug!("Loaded product {} with {} images", product.id, product.image_count());
                self.product = Some(product);
                true
            }
            Err(err) => {
                warn!("Failed to load product {}: {}", id, err);
                self.error = Some(err.message());
                false
            }
        }
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current state in the uniform `{ data, error }` shape.
    pub fn envelope(&self) -> Envelope<Product> {
        Envelope { data: self.product.clone(), error: self.error.clone() }
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    /// URL of the image currently shown.
    pub fn current_image(&self) -> Option<&str> {
        self.product.as_ref()?.images.get(self.image_index).map(String::as_str)
    }

    fn image_count(&self) -> usize {
        self.product.as_ref().map_or(0, Product::image_count)
    }

    pub fn can_go_back(&self) -> bool {
        self.image_index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.image_index + 1 < self.image_count()
    }

    /// Moves to the next image; stays put on the last one.
    pub fn next_image(&mut self) -> usize {
        if self.can_go_forward() {
            self.image_index += 1;
        }
        self.image_index
    }

    /// Moves to the previous image; stays put on the first one.
    pub fn previous_image(&mut self) -> usize {
        if self.can_go_back() {
            self.image_index -= 1;
        }
        self.image_index
    }

    /// Jumps to an image, clamped to the gallery.
    pub fn select_image(&mut self, index: usize) -> usize {
        self.image_index = index.min(self.image_count().saturating_sub(1));
        self.image_index
    }

    pub fn toggle_reviews(&mut self) -> bool {
        self.reviews_visible = !self.reviews_visible;
        self.reviews_visible
    }

    pub fn reviews_visible(&self) -> bool {
        self.reviews_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::{product, FixtureApi};

    fn controller() -> DetailController<FixtureApi> {
        let mut single = product(7, "Single Image", 3.0);
        single.images.truncate(1);
        let bare = Product { id: 8, title: "No Images".to_string(), ..Default::default() };

        let api = FixtureApi::new(vec![product(42, "Answer", 42.0), single, bare]);
        DetailController::new(Arc::new(api))
    }

    #[tokio::test]
    async fn test_get_product_envelope() {
        let api = FixtureApi::new(vec![product(42, "Answer", 42.0)]);

        let found: Envelope<Product> = api.get_product(42).await.into();
        assert_eq!(found.data.as_ref().map(|p| p.id), Some(42));
        assert!(found.error.is_none());

        let api = FixtureApi::new(vec![product(1, "Other", 1.0)]);
        let missing: Envelope<Product> = api.get_product(42).await.into();
        assert!(missing.data.is_none());
        assert!(!missing.error.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_success() {
        let mut detail = controller();

        assert!(detail.load(42).await);
        assert_eq!(detail.product().unwrap().title, "Answer");
        assert_eq!(detail.image_index(), 0);
        assert_eq!(detail.current_image(), Some("https://cdn.example.com/42/1.png"));
        assert!(detail.error().is_none());
    }

    #[tokio::test]
    async fn test_load_missing_sets_error() {
        let mut detail = controller();

        assert!(!detail.load(99).await);
        assert!(detail.product().is_none());
        assert_eq!(detail.error(), Some("Product with id '99' not found"));
        assert!(detail.current_image().is_none());
    }

    #[tokio::test]
    async fn test_envelope_reflects_state() {
        let mut detail = controller();

        detail.load(42).await;
        let envelope = detail.envelope();
        assert_eq!(envelope.data.map(|p| p.id), Some(42));
        assert!(envelope.error.is_none());

        detail.load(99).await;
        let envelope = detail.envelope();
        assert!(envelope.data.is_none());
        assert!(envelope.is_error());
    }

    #[tokio::test]
    async fn test_image_index_is_clamped() {
        let mut detail = controller();
        detail.load(42).await;

        assert!(!detail.can_go_back());
        assert_eq!(detail.previous_image(), 0);
        assert_eq!(detail.previous_image(), 0);

        for _ in 0..10 {
            detail.next_image();
        }
        assert_eq!(detail.image_index(), 2);
        assert!(!detail.can_go_forward());
        assert_eq!(detail.current_image(), Some("https://cdn.example.com/42/3.png"));

        assert_eq!(detail.previous_image(), 1);
        assert!(detail.can_go_back());
        assert!(detail.can_go_forward());
    }

    #[tokio::test]
    async fn test_single_and_empty_galleries() {
        let mut detail = controller();

        detail.load(7).await;
        assert_eq!(detail.next_image(), 0);
        assert!(!detail.can_go_forward());

        detail.load(8).await;
        assert_eq!(detail.next_image(), 0);
        assert_eq!(detail.previous_image(), 0);
        assert_eq!(detail.select_image(5), 0);
        assert!(detail.current_image().is_none());
    }

    #[tokio::test]
    async fn test_loading_new_product_resets_index() {
        let mut detail = controller();
        detail.load(42).await;
        detail.next_image();
        detail.next_image();

        detail.load(7).await;
        assert_eq!(detail.image_index(), 0);
    }

    #[tokio::test]
    async fn test_select_image_clamps() {
        let mut detail = controller();
        detail.load(42).await;

        assert_eq!(detail.select_image(1), 1);
        assert_eq!(detail.select_image(100), 2);
    }

    #[tokio::test]
    async fn test_loading_new_product_hides_reviews() {
        let mut detail = controller();
        detail.load(42).await;
        assert!(detail.toggle_reviews());

        detail.load(7).await;
        assert!(!detail.reviews_visible());
    }

    #[test]
    fn test_toggle_reviews() {
        let mut detail = controller();
        assert!(!detail.reviews_visible());
        assert!(detail.toggle_reviews());
        assert!(!detail.toggle_reviews());
    }
}
