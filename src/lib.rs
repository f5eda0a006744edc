//! Storefront Variant Resolution Core
//!
//! Client-side core for a retail storefront: given a product that declares
//! independent attribute axes (Color, Size, ...) and the customer's partial or
//! complete selection across them, deterministically compute the displayed
//! price, stock availability, representative image and add-to-cart readiness.
//!
//! ## Features
//! - Catalog document normalization into a strict domain model
//! - Pure variant resolution engine (combination override + additive fallback)
//! - Per-view selection state with overwrite semantics
//! - Cart adapter emitting the order API's add-item request shape
//! - Cart-changed notifications over NATS (optional)
//!
//! Persistence, payments, auth and the rendering layer are external
//! collaborators; this crate only consumes the catalog read API's product
//! document and emits the cart write API's request.

use thiserror::Error;

pub mod api;
pub mod bus;
pub mod cart;
pub mod domain;
pub mod view;

pub use api::cart::AddToCartRequest;
pub use api::catalog::CatalogProductDoc;
pub use bus::EventBus;
pub use cart::CartAdapter;
pub use domain::events::StorefrontEvent;
pub use domain::resolve::{resolve, ResolvedVariant};
pub use domain::selection::{SelectOutcome, SelectionState};
pub use view::{CatalogSource, LoadOutcome, LoadTicket, ProductView};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Checkout attempted before every axis has a selection.
    #[error("Selection incomplete: choose an option for every attribute")]
    IncompleteSelection,

    /// Multi-axis selection is complete but no combination covers it.
    /// A catalog-data integrity problem, not a user error.
    #[error("No variant combination matches the selected options")]
    VariantUnresolved,

    /// Resolved variant has no stock left.
    #[error("Selected variant is out of stock")]
    OutOfStock,

    /// Product exists but is not purchasable (draft or archived).
    #[error("Product is not available for purchase")]
    ProductUnavailable,

    /// Catalog document failed validation or normalization.
    #[error("Invalid catalog document: {0}")]
    InvalidCatalog(String),

    /// Transport failure reported by the catalog source.
    #[error("Catalog fetch failed: {0}")]
    CatalogFetch(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
