//! Variant resolution engine.
//!
//! Pure computation from a [`Product`] plus a [`SelectionState`] to a
//! [`ResolvedVariant`]. Runs synchronously on every selection change, so the
//! whole path is allocation-light and O(axes) thanks to the precomputed
//! combination index. The engine never errors: inconsistent catalog data
//! degrades to the additive pricing path instead.

use crate::domain::catalog::{CombinationId, OptionId, Product, VariationOption};
use crate::domain::selection::SelectionState;
use crate::domain::value_objects::Money;

/// Computed outcome for one selection: what the storefront displays and what
/// the cart adapter consumes. Not persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedVariant {
    /// True iff every axis has a selection (trivially true with zero axes).
    pub is_complete: bool,
    /// Display price. For incomplete selections this is the best-effort
    /// additive price; callers don't render it as final.
    pub price: Money,
    /// `None` means unknown or unbounded (inventory untracked, or the
    /// optimistic partial-selection heuristic found a path forward).
    pub stock_available: Option<u32>,
    /// Representative image: first selected option (in selection order) that
    /// declares one, else the product's primary gallery image.
    pub image_url: Option<String>,
    /// Set only when an exact combination matched.
    pub combination_id: Option<CombinationId>,
}

impl ResolvedVariant {
    /// Whether an order could be placed against this stock level.
    pub fn in_stock(&self) -> bool {
        self.stock_available.map_or(true, |q| q > 0)
    }
}

/// Resolve the current selection against a product.
pub fn resolve(product: &Product, selection: &SelectionState) -> ResolvedVariant {
    // A product without axes has a single implicit variant.
    if product.axes.is_empty() {
        return ResolvedVariant {
            is_complete: true,
            price: clamp_price(product.list_price().clone()),
            stock_available: product.track_inventory.then_some(product.stock_quantity),
            image_url: product.primary_image().map(|img| img.url.clone()),
            combination_id: None,
        };
    }

    // In selection order; entries that no longer resolve against the product
    // are dropped rather than rejected.
    let selected: Vec<&VariationOption> = selection
        .entries()
        .filter_map(|(axis_id, option_id)| product.option(axis_id, option_id))
        .collect();
    let image_url = representative_image(product, &selected);

    if selected.len() < product.axes.len() {
        return ResolvedVariant {
            is_complete: false,
            price: clamp_price(additive_price(product, &selected, false)),
            stock_available: optimistic_availability(product, &selected),
            image_url,
            combination_id: None,
        };
    }

    let candidate: Vec<OptionId> = selected.iter().map(|o| o.id).collect();
    if let Some(combination) = product.combination_for(&candidate) {
        let stock_available = if product.track_inventory {
            combination.stock.or_else(|| min_option_stock(&selected))
        } else {
            None
        };
        tracing::debug!(
            product = %product.id,
            combination = combination.id.0,
            "resolved exact combination"
        );
        return ResolvedVariant {
            is_complete: true,
            price: clamp_price(combination.price.clone()),
            stock_available,
            image_url,
            combination_id: Some(combination.id),
        };
    }

    if product.axes.len() > 1 {
        tracing::warn!(
            product = %product.id,
            "complete multi-axis selection has no matching combination"
        );
    }
    ResolvedVariant {
        is_complete: true,
        price: clamp_price(additive_price(product, &selected, true)),
        stock_available: product.track_inventory.then(|| min_option_stock(&selected)).flatten(),
        image_url,
        combination_id: None,
    }
}

/// Base price plus the selected options' signed adjustments. When
/// `carry_sale_delta` is set and a sale price exists, the regular/sale
/// discount delta is carried through to the adjusted price.
fn additive_price(product: &Product, selected: &[&VariationOption], carry_sale_delta: bool) -> Money {
    let mut price = selected
        .iter()
        .fold(product.regular_price.clone(), |acc, option| {
            acc.add(&option.price_adjustment).unwrap_or(acc)
        });
    if carry_sale_delta {
        if let Some(sale) = &product.sale_price {
            let delta = product.regular_price.sub(sale).unwrap_or_else(|_| Money::zero(product.currency()));
            price = price.sub(&delta).unwrap_or(price);
        }
    }
    price
}

fn clamp_price(price: Money) -> Money {
    if price.is_negative() {
        // The catalog let adjustments push the price below zero; display floor
        // is zero.
        tracing::warn!(%price, "clamping negative computed price to zero");
        price.floor_zero()
    } else {
        price
    }
}

/// "At least one path forward remains": with nothing selected, any in-stock
/// option anywhere keeps the product available; with a partial selection,
/// every already-selected option must still have stock. Collapses to a zero
/// count when the heuristic fails, stays unknown when it holds.
fn optimistic_availability(product: &Product, selected: &[&VariationOption]) -> Option<u32> {
    if !product.track_inventory {
        return None;
    }
    let available = if selected.is_empty() {
        product
            .axes
            .iter()
            .any(|axis| axis.options.iter().any(VariationOption::has_stock))
    } else {
        selected.iter().all(|option| option.has_stock())
    };
    if available {
        None
    } else {
        Some(0)
    }
}

/// Minimum declared stock across the selected options; `None` when no option
/// declares one.
fn min_option_stock(selected: &[&VariationOption]) -> Option<u32> {
    selected.iter().filter_map(|o| o.stock_quantity).min()
}

fn representative_image(product: &Product, selected: &[&VariationOption]) -> Option<String> {
    selected
        .iter()
        .find_map(|option| option.image_url.as_deref().filter(|url| !url.is_empty()))
        .map(str::to_string)
        .or_else(|| product.primary_image().map(|img| img.url.clone()))
}
