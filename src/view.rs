//! Product-detail view controller.
//!
//! Owns the one product and one [`SelectionState`] a detail view works with.
//! The catalog fetch is the view's single suspend point; each navigation
//! bumps a generation counter and a response carrying a stale generation is
//! discarded, so a shopper who clicks away mid-fetch never sees the previous
//! page's product flash in.

use crate::api::cart::AddToCartRequest;
use crate::api::catalog::CatalogProductDoc;
use crate::bus::EventBus;
use crate::cart::CartAdapter;
use crate::domain::catalog::{AxisId, OptionId, Product};
use crate::domain::events::StorefrontEvent;
use crate::domain::resolve::{resolve, ResolvedVariant};
use crate::domain::selection::{SelectOutcome, SelectionState};
use crate::{Result, StorefrontError};

/// Catalog read endpoint, as seen by a product-detail view. `Ok(None)` is a
/// not-found product; transport failures map to
/// [`StorefrontError::CatalogFetch`].
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    async fn fetch_product(&self, slug: &str) -> Result<Option<CatalogProductDoc>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    NotFound,
    /// The response belonged to a navigation that has since been superseded;
    /// nothing was applied.
    Superseded,
}

/// Ticket tying a fetch to the navigation that started it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct ProductView<C: CatalogSource> {
    source: C,
    bus: EventBus,
    product: Option<Product>,
    selection: SelectionState,
    generation: u64,
}

impl<C: CatalogSource> ProductView<C> {
    pub fn new(source: C, bus: EventBus) -> Self {
        Self {
            source,
            bus,
            product: None,
            selection: SelectionState::new(),
            generation: 0,
        }
    }

    /// Fetch and apply a product in one step. Embedding runtimes that spawn
    /// the fetch use [`Self::begin_load`]/[`Self::apply`] directly.
    pub async fn load(&mut self, slug: &str) -> Result<LoadOutcome> {
        let ticket = self.begin_load();
        let fetched = self.source.fetch_product(slug).await;
        self.apply(ticket, fetched)
    }

    /// Start a navigation: supersedes any fetch still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Apply a fetch result. A stale ticket is discarded untouched; everything
    /// else replaces the view's product and resets the selection.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<Option<CatalogProductDoc>>,
    ) -> Result<LoadOutcome> {
        if ticket.0 != self.generation {
            tracing::debug!("discarding catalog response for superseded navigation");
            return Ok(LoadOutcome::Superseded);
        }
        self.selection.clear();
        let fetched = fetched.inspect_err(|_| self.product = None)?;
        match fetched {
            None => {
                self.product = None;
                Ok(LoadOutcome::NotFound)
            }
            Some(doc) => match doc.normalize() {
                Ok(product) => {
                    tracing::debug!(slug = %product.slug, "product loaded");
                    self.product = Some(product);
                    Ok(LoadOutcome::Loaded)
                }
                Err(e) => {
                    self.product = None;
                    Err(e)
                }
            },
        }
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Record an option click. A no-op (`RejectedUnknown`) when no product is
    /// loaded.
    pub fn select(&mut self, axis_id: AxisId, option_id: OptionId) -> SelectOutcome {
        let Some(product) = &self.product else {
            return SelectOutcome::RejectedUnknown;
        };
        self.selection.select(product, axis_id, option_id)
    }

    /// Resolve the current selection; `None` until a product is loaded.
    pub fn resolved(&self) -> Option<ResolvedVariant> {
        self.product.as_ref().map(|p| resolve(p, &self.selection))
    }

    /// Build the add-to-cart request, broadcast the cart-changed event and
    /// reset the selection. The caller submits the returned request to the
    /// cart write endpoint.
    pub async fn add_to_cart(&mut self, quantity: u32) -> Result<AddToCartRequest> {
        let product = self
            .product
            .as_ref()
            .ok_or(StorefrontError::ProductUnavailable)?;
        let request = CartAdapter::add_to_cart(product, &self.selection, quantity)?;
        self.bus
            .publish(&StorefrontEvent::CartChanged {
                product_id: request.product_id,
                quantity: request.quantity,
                variant_combination_id: request.variant_combination_id,
                variation_id: request.variation_id,
            })
            .await;
        self.selection.clear();
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapSource(HashMap<String, serde_json::Value>);

    impl CatalogSource for MapSource {
        async fn fetch_product(&self, slug: &str) -> Result<Option<CatalogProductDoc>> {
            self.0
                .get(slug)
                .map(|raw| {
                    serde_json::from_value(raw.clone())
                        .map_err(|e| StorefrontError::InvalidCatalog(e.to_string()))
                })
                .transpose()
        }
    }

    struct FailingSource;

    impl CatalogSource for FailingSource {
        async fn fetch_product(&self, _slug: &str) -> Result<Option<CatalogProductDoc>> {
            Err(StorefrontError::CatalogFetch("connection reset".into()))
        }
    }

    fn tee_doc() -> serde_json::Value {
        serde_json::json!({
            "id": "7f6b4a1e-63c5-4f24-9f6e-2a4f2d8f1c01",
            "slug": "classic-tee",
            "name": "Classic Tee",
            "regularPrice": 25.0,
            "trackInventory": true,
            "variations": [
                { "id": 1, "name": "Size", "options": [
                    { "id": 21, "name": "S", "stockQuantity": 4 },
                    { "id": 22, "name": "M", "priceAdjustment": 5.0, "stockQuantity": 2 }
                ]}
            ]
        })
    }

    fn view_for(docs: &[(&str, serde_json::Value)]) -> ProductView<MapSource> {
        let source = MapSource(
            docs.iter()
                .map(|(slug, doc)| (slug.to_string(), doc.clone()))
                .collect(),
        );
        ProductView::new(source, EventBus::disconnected())
    }

    #[tokio::test]
    async fn test_load_select_add_to_cart_flow() -> anyhow::Result<()> {
        let mut view = view_for(&[("classic-tee", tee_doc())]);
        assert_eq!(view.load("classic-tee").await?, LoadOutcome::Loaded);

        assert!(view.select(AxisId(1), OptionId(22)).is_selected());
        let resolved = view.resolved().unwrap();
        assert!(resolved.is_complete);
        assert_eq!(resolved.stock_available, Some(2));

        let request = view.add_to_cart(5).await?;
        assert_eq!(request.quantity, 2);
        assert_eq!(request.variation_id, Some(OptionId(22)));
        // Selection resets after a successful add so the reused view starts
        // clean.
        assert!(view.selection().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_not_found_clears_product() {
        let mut view = view_for(&[("classic-tee", tee_doc())]);
        view.load("classic-tee").await.unwrap();
        assert_eq!(view.load("gone").await.unwrap(), LoadOutcome::NotFound);
        assert!(view.product().is_none());
        assert!(view.resolved().is_none());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let mut view = view_for(&[("classic-tee", tee_doc())]);
        let first = view.begin_load();
        // Shopper navigates away before the first response lands.
        let second = view.begin_load();
        let doc = serde_json::from_value(tee_doc()).unwrap();
        assert_eq!(
            view.apply(first, Ok(Some(doc))).unwrap(),
            LoadOutcome::Superseded
        );
        assert!(view.product().is_none());

        let doc = serde_json::from_value(tee_doc()).unwrap();
        assert_eq!(view.apply(second, Ok(Some(doc))).unwrap(), LoadOutcome::Loaded);
        assert!(view.product().is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let mut view = ProductView::new(FailingSource, EventBus::disconnected());
        assert!(matches!(
            view.load("classic-tee").await,
            Err(StorefrontError::CatalogFetch(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_document_clears_product() {
        let mut bad = tee_doc();
        bad["salePrice"] = serde_json::json!(30.0);
        let mut view = view_for(&[("classic-tee", bad)]);
        assert!(matches!(
            view.load("classic-tee").await,
            Err(StorefrontError::InvalidCatalog(_))
        ));
        assert!(view.product().is_none());
    }

    #[tokio::test]
    async fn test_select_without_product_is_noop() {
        let mut view = view_for(&[]);
        assert_eq!(view.select(AxisId(1), OptionId(21)), SelectOutcome::RejectedUnknown);
        assert!(matches!(
            view.add_to_cart(1).await,
            Err(StorefrontError::ProductUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_incomplete_selection_blocks_checkout() {
        let mut view = view_for(&[("classic-tee", tee_doc())]);
        view.load("classic-tee").await.unwrap();
        assert!(matches!(
            view.add_to_cart(1).await,
            Err(StorefrontError::IncompleteSelection)
        ));
    }
}
