//! Domain events
//!
//! Emitted by the storefront core for independent UI surfaces (cart badge,
//! mini-cart) to react to. Delivery is the event bus's concern.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{CombinationId, OptionId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorefrontEvent {
    /// An item was accepted into the cart.
    CartChanged {
        product_id: Uuid,
        quantity: u32,
        variant_combination_id: Option<CombinationId>,
        variation_id: Option<OptionId>,
    },
}

impl StorefrontEvent {
    /// NATS subject the event is published under.
    pub fn subject(&self) -> &'static str {
        match self {
            StorefrontEvent::CartChanged { .. } => "storefront.cart.changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_changed_serializes_with_tag() {
        let event = StorefrontEvent::CartChanged {
            product_id: Uuid::nil(),
            quantity: 2,
            variant_combination_id: Some(CombinationId(7)),
            variation_id: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "cart_changed");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["variant_combination_id"], 7);
        assert_eq!(event.subject(), "storefront.cart.changed");
    }
}
