//! Catalog entities: products, variation axes, options and combinations.
//!
//! These are the strict shapes the rest of the crate works with. They are
//! produced once, by the validating adapter in [`crate::api::catalog`]; engine
//! code never re-checks what normalization already guaranteed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::domain::value_objects::Money;

/// Identifier of one variation axis within a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisId(pub u64);

/// Identifier of one selectable option within an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionId(pub u64);

/// Identifier of one concrete axis-combination entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombinationId(pub u64);

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProductStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

#[derive(Clone, Debug)]
pub struct ProductImage {
    pub url: String,
    pub alt: Option<String>,
    pub position: u32,
}

/// One selectable choice within one axis.
#[derive(Clone, Debug)]
pub struct VariationOption {
    pub id: OptionId,
    pub axis_id: AxisId,
    pub name: String,
    /// Signed additive fallback; only applies when no combination matches.
    pub price_adjustment: Money,
    /// `None` means stock is not tracked at the option level.
    pub stock_quantity: Option<u32>,
    pub image_url: Option<String>,
}

impl VariationOption {
    /// Whether this option still has stock, treating untracked as in stock.
    pub fn has_stock(&self) -> bool {
        self.stock_quantity.map_or(true, |q| q > 0)
    }
}

/// A named attribute dimension ("Color", "Size") owning an ordered option set.
#[derive(Clone, Debug)]
pub struct VariationAxis {
    pub id: AxisId,
    pub name: String,
    pub options: Vec<VariationOption>,
}

impl VariationAxis {
    /// Axes named "color" (case-insensitive) render as swatches.
    pub fn is_color(&self) -> bool {
        self.name.eq_ignore_ascii_case("color") || self.name.eq_ignore_ascii_case("colour")
    }

    pub fn option(&self, id: OptionId) -> Option<&VariationOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// One concrete tuple of options (exactly one per axis) carrying its own
/// absolute price override and optional stock count.
#[derive(Clone, Debug)]
pub struct VariantCombination {
    pub id: CombinationId,
    pub option_ids: Vec<OptionId>,
    pub price: Money,
    pub stock: Option<u32>,
}

/// Precomputed lookup from a canonical sorted-option-id key to a combination,
/// so matching runs in O(1) amortized on every selection change instead of a
/// linear scan.
#[derive(Clone, Debug, Default)]
pub struct CombinationIndex {
    by_key: HashMap<Vec<OptionId>, usize>,
}

impl CombinationIndex {
    /// Build the index, skipping entries that can never match: wrong
    /// cardinality, an option id no axis declares, or a key a previous
    /// combination already claimed. Catalog data is edited independently of
    /// code, so malformed entries degrade to a non-match rather than an error.
    pub fn build(axes: &[VariationAxis], combinations: &[VariantCombination]) -> Self {
        let mut by_key = HashMap::with_capacity(combinations.len());
        for (idx, combo) in combinations.iter().enumerate() {
            if combo.option_ids.len() != axes.len() {
                tracing::warn!(
                    combination = combo.id.0,
                    expected = axes.len(),
                    got = combo.option_ids.len(),
                    "skipping combination with wrong option cardinality"
                );
                continue;
            }
            let known = combo
                .option_ids
                .iter()
                .all(|id| axes.iter().any(|axis| axis.option(*id).is_some()));
            if !known {
                tracing::warn!(
                    combination = combo.id.0,
                    "skipping combination referencing unknown options"
                );
                continue;
            }
            let key = Self::canonical_key(&combo.option_ids);
            match by_key.entry(key) {
                Entry::Occupied(_) => {
                    tracing::warn!(
                        combination = combo.id.0,
                        "skipping combination duplicating an existing option set"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
            }
        }
        Self { by_key }
    }

    fn canonical_key(option_ids: &[OptionId]) -> Vec<OptionId> {
        let mut key = option_ids.to_vec();
        key.sort_unstable();
        key
    }

    /// Exact-set lookup: same cardinality, same members. Crate-internal: the
    /// stored indices are positions in the slice the index was built from, so
    /// only [`Product::combination_for`] may pair them up.
    pub(crate) fn lookup<'a>(
        &self,
        combinations: &'a [VariantCombination],
        candidate: &[OptionId],
    ) -> Option<&'a VariantCombination> {
        let key = Self::canonical_key(candidate);
        self.by_key.get(&key).map(|&idx| &combinations[idx])
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// A catalog product as the storefront sees it.
#[derive(Clone, Debug)]
pub struct Product {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub regular_price: Money,
    /// Must be below the regular price when present; enforced at normalization.
    pub sale_price: Option<Money>,
    pub track_inventory: bool,
    /// Authoritative only when `axes` is empty.
    pub stock_quantity: u32,
    pub axes: Vec<VariationAxis>,
    pub combinations: Vec<VariantCombination>,
    pub images: Vec<ProductImage>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    index: CombinationIndex,
}

impl Product {
    /// Assemble a product and precompute its combination index. Only the
    /// validating adapter and tests construct products directly.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        slug: String,
        name: String,
        regular_price: Money,
        sale_price: Option<Money>,
        track_inventory: bool,
        stock_quantity: u32,
        axes: Vec<VariationAxis>,
        combinations: Vec<VariantCombination>,
        images: Vec<ProductImage>,
        status: ProductStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let index = CombinationIndex::build(&axes, &combinations);
        Self {
            id,
            slug,
            name,
            regular_price,
            sale_price,
            track_inventory,
            stock_quantity,
            axes,
            combinations,
            images,
            status,
            created_at,
            updated_at,
            index,
        }
    }

    pub fn is_purchasable(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Price before any variation is considered: sale price when present.
    pub fn list_price(&self) -> &Money {
        self.sale_price.as_ref().unwrap_or(&self.regular_price)
    }

    pub fn currency(&self) -> &str {
        self.regular_price.currency()
    }

    pub fn axis(&self, id: AxisId) -> Option<&VariationAxis> {
        self.axes.iter().find(|a| a.id == id)
    }

    pub fn option(&self, axis_id: AxisId, option_id: OptionId) -> Option<&VariationOption> {
        self.axis(axis_id).and_then(|a| a.option(option_id))
    }

    pub fn combination_for(&self, candidate: &[OptionId]) -> Option<&VariantCombination> {
        self.index.lookup(&self.combinations, candidate)
    }

    /// First entry of the image gallery, by position.
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.iter().min_by_key(|img| img.position)
    }
}
