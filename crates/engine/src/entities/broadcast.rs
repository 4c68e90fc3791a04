//! Broadcast Engine - fans committed events out to subscribers.
//!
//! Lock order: a location-scoped batch first takes a snapshot of who is
//! where under a brief state read lock, releases it, and only then walks
//! the subscription registry. The two are never held together.

use std::sync::Arc;

use wayfarer_domain::{EventScope, GameEvent};

use super::subscriptions::{DeliveryReport, SubscriptionRegistry};
use super::world_state::{LocationSnapshot, WorldStateStore};

pub struct Broadcaster {
    state: Arc<WorldStateStore>,
    registry: Arc<SubscriptionRegistry>,
}

impl Broadcaster {
    pub fn new(state: Arc<WorldStateStore>, registry: Arc<SubscriptionRegistry>) -> Self {
        Self { state, registry }
    }

    /// Deliver a single event to every subscriber that should see it.
    pub async fn broadcast(&self, event: &GameEvent) -> DeliveryReport {
        self.publish(std::slice::from_ref(event)).await
    }

    /// Deliver a batch of events in order.
    ///
    /// One location snapshot is shared by every scoped event in the batch,
    /// taken after the batch was committed.
    pub async fn publish(&self, events: &[GameEvent]) -> DeliveryReport {
        if events.is_empty() || self.registry.is_empty() {
            return DeliveryReport::default();
        }

        let snapshot: Option<LocationSnapshot> =
            if events.iter().any(|event| !event.scope().is_global()) {
                Some(self.state.location_snapshot().await)
            } else {
                None
            };

        let mut total = DeliveryReport::default();
        for event in events {
            let report = match (event.scope(), snapshot.as_ref()) {
                (EventScope::Location(location), Some(snapshot)) => self
                    .registry
                    .deliver(event, |player| snapshot.get(player) == Some(location)),
                _ => self.registry.deliver(event, |_| true),
            };
            tracing::trace!(
                event_type = event.event_type().as_str(),
                delivered = report.delivered,
                evicted = report.evicted,
                "Event published"
            );
            total.delivered += report.delivered;
            total.evicted += report.evicted;
        }
        total
    }
}
