//! Entity modules - the in-memory world and its event fan-out.
//!
//! `world_state` owns locations and players, `subscriptions` owns delivery
//! queues, `broadcast` connects the two, and `world` composes them into the
//! per-game aggregate.

pub mod broadcast;
pub mod subscriptions;
pub mod world;
pub mod world_state;

pub use broadcast::Broadcaster;
pub use subscriptions::{DeliveryReport, Subscription, SubscriptionRegistry, SubscriptionStatus};
pub use world::{World, WORLD_ID_LEN};
pub use world_state::{AttackOutcome, LocationSnapshot, MoveOutcome, WorldStateStore};
