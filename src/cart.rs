//! Cart adapter: turns a fully-resolved selection into the cart API's
//! add-item request, refusing anything the order service would reject.

use crate::api::cart::AddToCartRequest;
use crate::domain::catalog::Product;
use crate::domain::resolve::{resolve, ResolvedVariant};
use crate::domain::selection::SelectionState;
use crate::domain::value_objects::Quantity;
use crate::{Result, StorefrontError};

pub struct CartAdapter;

impl CartAdapter {
    /// Build the add-to-cart request for the current selection.
    ///
    /// Preconditions, in order: the product is purchasable, the selection is
    /// complete, and a multi-axis selection resolved to an exact combination.
    /// An unmatched multi-axis selection is a catalog-integrity failure, never
    /// a guess; single-axis products fall back to the legacy `variationId`
    /// field instead. Quantity is clamped to `[1, stock]` while inventory is
    /// tracked and the stock count is known.
    pub fn add_to_cart(
        product: &Product,
        selection: &SelectionState,
        desired_quantity: u32,
    ) -> Result<AddToCartRequest> {
        if !product.is_purchasable() {
            return Err(StorefrontError::ProductUnavailable);
        }

        let resolved = resolve(product, selection);
        if !resolved.is_complete {
            return Err(StorefrontError::IncompleteSelection);
        }

        let (variant_combination_id, variation_id) = match product.axes.len() {
            0 => (None, None),
            1 => {
                // Legacy single-axis contract: always the option id, even when
                // a combination matched.
                let axis_id = product.axes[0].id;
                let option_id = selection
                    .selected(axis_id)
                    .ok_or(StorefrontError::IncompleteSelection)?;
                (None, Some(option_id))
            }
            _ => match resolved.combination_id {
                Some(id) => (Some(id), None),
                None => {
                    tracing::warn!(
                        product = %product.id,
                        "refusing add-to-cart: no combination covers the selection"
                    );
                    return Err(StorefrontError::VariantUnresolved);
                }
            },
        };

        if !resolved.in_stock() {
            return Err(StorefrontError::OutOfStock);
        }

        let quantity = Self::clamp_quantity(product, &resolved, desired_quantity);
        Ok(AddToCartRequest {
            product_id: product.id,
            quantity,
            variant_combination_id,
            variation_id,
        })
    }

    fn clamp_quantity(product: &Product, resolved: &ResolvedVariant, desired: u32) -> u32 {
        let max = if product.track_inventory {
            resolved.stock_available
        } else {
            None
        };
        Quantity::clamp_order(desired, max).value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::fixtures::*;
    use crate::domain::catalog::{AxisId, CombinationId, OptionId, ProductStatus, VariationAxis};

    fn select_all(product: &Product, picks: &[(u64, u64)]) -> SelectionState {
        let mut s = SelectionState::new();
        for &(axis, opt) in picks {
            assert!(s.select(product, AxisId(axis), OptionId(opt)).is_selected());
        }
        s
    }

    fn color_size_axes() -> Vec<VariationAxis> {
        // Four options per axis, most combinations deliberately undefined.
        vec![
            axis(
                1,
                "Color",
                vec![
                    option(11, 1, "Red", 0, Some(3)),
                    option(12, 1, "Blue", 0, Some(3)),
                    option(13, 1, "Green", 0, Some(3)),
                    option(14, 1, "Black", 0, Some(3)),
                ],
            ),
            axis(
                2,
                "Size",
                vec![
                    option(21, 2, "S", 0, Some(3)),
                    option(22, 2, "M", 0, Some(3)),
                    option(23, 2, "L", 0, Some(3)),
                    option(24, 2, "XL", 0, Some(3)),
                ],
            ),
        ]
    }

    #[test]
    fn test_no_axes_request_has_no_variant_fields() {
        let p = product_with(100, None, true, 5, vec![], vec![]);
        let req = CartAdapter::add_to_cart(&p, &SelectionState::new(), 2).unwrap();
        assert_eq!(req.quantity, 2);
        assert_eq!(req.variant_combination_id, None);
        assert_eq!(req.variation_id, None);
    }

    #[test]
    fn test_incomplete_selection_refused() {
        let p = product(color_size_axes(), vec![]);
        let s = select_all(&p, &[(1, 11)]);
        assert!(matches!(
            CartAdapter::add_to_cart(&p, &s, 1),
            Err(StorefrontError::IncompleteSelection)
        ));
    }

    #[test]
    fn test_undefined_pair_is_variant_unresolved() {
        // Only 2 of the 16 combinations exist.
        let combos = vec![combo(100, &[11, 21], 120, Some(2)), combo(101, &[12, 22], 125, Some(1))];
        let p = product(color_size_axes(), combos);
        let s = select_all(&p, &[(1, 13), (2, 24)]);
        assert!(matches!(
            CartAdapter::add_to_cart(&p, &s, 1),
            Err(StorefrontError::VariantUnresolved)
        ));
    }

    #[test]
    fn test_matched_combination_populates_combination_id() {
        let combos = vec![combo(100, &[11, 21], 120, Some(2))];
        let p = product(color_size_axes(), combos);
        let s = select_all(&p, &[(1, 11), (2, 21)]);
        let req = CartAdapter::add_to_cart(&p, &s, 1).unwrap();
        assert_eq!(req.variant_combination_id, Some(CombinationId(100)));
        assert_eq!(req.variation_id, None);
    }

    #[test]
    fn test_single_axis_uses_legacy_variation_id() {
        // Legacy catalog entry: one "Size" axis, no combinations table at all.
        let axes = vec![axis(
            2,
            "Size",
            vec![option(21, 2, "S", 0, None), option(22, 2, "M", 5, None), option(23, 2, "L", 10, None)],
        )];
        let p = product(axes, vec![]);
        let s = select_all(&p, &[(2, 22)]);
        let resolved = resolve(&p, &s);
        assert_eq!(resolved.price, money(105));
        let req = CartAdapter::add_to_cart(&p, &s, 1).unwrap();
        assert_eq!(req.variation_id, Some(OptionId(22)));
        assert_eq!(req.variant_combination_id, None);
    }

    #[test]
    fn test_single_axis_prefers_legacy_field_even_with_combination() {
        let axes = vec![axis(2, "Size", vec![option(21, 2, "S", 0, Some(4))])];
        let p = product(axes, vec![combo(100, &[21], 90, Some(4))]);
        let s = select_all(&p, &[(2, 21)]);
        let req = CartAdapter::add_to_cart(&p, &s, 1).unwrap();
        assert_eq!(req.variation_id, Some(OptionId(21)));
        assert_eq!(req.variant_combination_id, None);
    }

    #[test]
    fn test_out_of_stock_refused() {
        let axes = vec![axis(1, "Color", vec![option(12, 1, "Blue", 0, None)])];
        let p = product(axes, vec![combo(101, &[12], 100, Some(0))]);
        let s = select_all(&p, &[(1, 12)]);
        assert!(matches!(
            CartAdapter::add_to_cart(&p, &s, 1),
            Err(StorefrontError::OutOfStock)
        ));
    }

    #[test]
    fn test_quantity_clamped_to_stock_when_tracked() {
        let combos = vec![combo(100, &[11, 21], 120, Some(2))];
        let p = product(color_size_axes(), combos);
        let s = select_all(&p, &[(1, 11), (2, 21)]);
        assert_eq!(CartAdapter::add_to_cart(&p, &s, 99).unwrap().quantity, 2);
        assert_eq!(CartAdapter::add_to_cart(&p, &s, 0).unwrap().quantity, 1);
    }

    #[test]
    fn test_quantity_unclamped_when_untracked() {
        let p = product_with(100, None, false, 0, vec![], vec![]);
        let req = CartAdapter::add_to_cart(&p, &SelectionState::new(), 40).unwrap();
        assert_eq!(req.quantity, 40);
    }

    #[test]
    fn test_non_active_product_refused() {
        let mut p = product_with(100, None, false, 0, vec![], vec![]);
        p.status = ProductStatus::Archived;
        assert!(matches!(
            CartAdapter::add_to_cart(&p, &SelectionState::new(), 1),
            Err(StorefrontError::ProductUnavailable)
        ));
    }
}
