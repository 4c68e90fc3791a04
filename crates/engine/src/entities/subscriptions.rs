//! Subscription Registry - per-player bounded delivery queues.
//!
//! Each subscription owns a bounded `mpsc` queue. Delivery never waits: a
//! full queue evicts its subscriber, a closed one is dropped from the
//! registry. Registrations live in a `DashMap`, independent of the world
//! state lock.

use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use dashmap::DashMap;
use futures_util::Stream;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;
use wayfarer_domain::{GameEvent, PlayerId};

/// Lifecycle of a subscription. `Removed` and `Evicted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SubscriptionStatus {
    /// Registered and receiving
    Active = 0,
    /// Explicitly unsubscribed
    Removed = 1,
    /// Closed because its queue was full
    Evicted = 2,
}

impl SubscriptionStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Active,
            1 => Self::Removed,
            _ => Self::Evicted,
        }
    }
}

/// Shared status cell; only `Active` can transition.
#[derive(Debug)]
struct StatusCell(AtomicU8);

impl StatusCell {
    fn active() -> Arc<Self> {
        Arc::new(Self(AtomicU8::new(SubscriptionStatus::Active as u8)))
    }

    fn get(&self) -> SubscriptionStatus {
        SubscriptionStatus::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move from `Active` to `to`. Returns false if already terminal.
    fn close(&self, to: SubscriptionStatus) -> bool {
        self.0
            .compare_exchange(
                SubscriptionStatus::Active as u8,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

struct Slot {
    player_id: PlayerId,
    sender: mpsc::Sender<GameEvent>,
    status: Arc<StatusCell>,
}

/// Counts from a single delivery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub evicted: usize,
}

/// Registry of live subscriptions for one world.
pub struct SubscriptionRegistry {
    slots: DashMap<Uuid, Slot>,
    capacity: usize,
}

impl SubscriptionRegistry {
    /// `capacity` is the number of pending events a queue holds before its
    /// subscriber is evicted. Zero is treated as one.
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            slots: DashMap::new(),
            capacity: capacity.max(1),
        })
    }

    /// Register a fresh queue for `player_id`.
    pub fn subscribe(self: &Arc<Self>, player_id: PlayerId) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = Uuid::new_v4();
        let status = StatusCell::active();

        self.slots.insert(
            id,
            Slot {
                player_id: player_id.clone(),
                sender,
                status: Arc::clone(&status),
            },
        );
        tracing::debug!(subscription_id = %id, player_id = %player_id, "Subscribed");

        Subscription {
            id,
            player_id,
            receiver,
            status,
            registry: Arc::downgrade(self),
        }
    }

    /// Remove a registration and close its queue.
    ///
    /// Idempotent: returns false if it was already removed or evicted.
    pub fn unsubscribe(&self, id: Uuid) -> bool {
        match self.slots.remove(&id) {
            Some((_, slot)) => {
                slot.status.close(SubscriptionStatus::Removed);
                tracing::debug!(subscription_id = %id, player_id = %slot.player_id, "Unsubscribed");
                true
            }
            None => false,
        }
    }

    /// Try to enqueue `event` on every active subscription whose player
    /// passes `accepts`.
    ///
    /// Never waits. Full queues are evicted, closed queues are dropped.
    pub fn deliver(&self, event: &GameEvent, accepts: impl Fn(&PlayerId) -> bool) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut stale = Vec::new();

        for entry in self.slots.iter() {
            let slot = entry.value();
            if slot.status.get() != SubscriptionStatus::Active || !accepts(&slot.player_id) {
                continue;
            }
            match slot.sender.try_send(event.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    if slot.status.close(SubscriptionStatus::Evicted) {
                        tracing::warn!(
                            subscription_id = %entry.key(),
                            player_id = %slot.player_id,
                            "Subscriber queue full, evicting"
                        );
                        report.evicted += 1;
                    }
                    stale.push(*entry.key());
                }
                Err(TrySendError::Closed(_)) => {
                    slot.status.close(SubscriptionStatus::Removed);
                    stale.push(*entry.key());
                }
            }
        }

        // Shard guards from the iteration must be released before removal
        for id in stale {
            self.slots.remove(&id);
        }
        report
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of live subscriptions held for `player_id`.
    #[cfg(test)]
    pub(crate) fn count_for(&self, player_id: &PlayerId) -> usize {
        self.slots
            .iter()
            .filter(|entry| &entry.value().player_id == player_id)
            .count()
    }
}

/// Owned handle to a subscription's queue.
///
/// Dropping the handle unsubscribes it.
pub struct Subscription {
    id: Uuid,
    player_id: PlayerId,
    receiver: mpsc::Receiver<GameEvent>,
    status: Arc<StatusCell>,
    registry: Weak<SubscriptionRegistry>,
}

impl Subscription {
    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    #[inline]
    pub fn status(&self) -> SubscriptionStatus {
        self.status.get()
    }

    /// Next event in FIFO order.
    ///
    /// Returns `None` once the subscription is removed or evicted and every
    /// event queued before that has been drained.
    pub async fn recv(&mut self) -> Option<GameEvent> {
        self.receiver.recv().await
    }

    /// Unsubscribe explicitly. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
        self.status.close(SubscriptionStatus::Removed);
        self.receiver.close();
    }
}

impl Stream for Subscription {
    type Item = GameEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("player_id", &self.player_id)
            .field("status", &self.status())
            .finish()
    }
}
