//! Event bus for cart-changed notifications.
//!
//! Independent UI surfaces (cart badge, mini-cart) subscribe out of process;
//! the core only publishes. The NATS client is optional so the storefront
//! still works with no broker configured, and delivery is best-effort: a
//! publish failure is logged, never surfaced to the shopper.

use crate::domain::events::StorefrontEvent;

#[derive(Clone)]
pub struct EventBus {
    nats: Option<async_nats::Client>,
}

impl EventBus {
    pub fn new(nats: Option<async_nats::Client>) -> Self {
        Self { nats }
    }

    /// Bus without a broker; every publish is a silent no-op.
    pub fn disconnected() -> Self {
        Self { nats: None }
    }

    pub fn is_connected(&self) -> bool {
        self.nats.is_some()
    }

    pub async fn publish(&self, event: &StorefrontEvent) {
        let Some(client) = &self.nats else {
            tracing::debug!(subject = event.subject(), "event bus not connected, dropping event");
            return;
        };
        let payload = match serde_json::to_vec(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize storefront event");
                return;
            }
        };
        if let Err(e) = client.publish(event.subject(), payload.into()).await {
            tracing::warn!(error = %e, subject = event.subject(), "event publish failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_disconnected_bus_drops_events() {
        let bus = EventBus::disconnected();
        assert!(!bus.is_connected());
        bus.publish(&StorefrontEvent::CartChanged {
            product_id: Uuid::nil(),
            quantity: 1,
            variant_combination_id: None,
            variation_id: None,
        })
        .await;
    }
}
