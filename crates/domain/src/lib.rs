//! Wayfarer Domain - the world model of a multiplayer text adventure
//!
//! Pure types and rules with no async runtime and no randomness source:
//! the engine injects both. Mutations on aggregates return outcome enums;
//! the engine turns those into `GameEvent`s.

pub mod aggregates;
pub mod error;
pub mod events;
pub mod graph;
pub mod ids;
pub mod value_objects;

pub use aggregates::{Attributes, Location, Player, STARTING_HEALTH};
pub use error::{DomainError, ErrorKind, WorldError};
pub use events::{DamageOutcome, EventScope, GameEvent, GameEventType};
pub use graph::{generate_world_graph, WorldGraph};
pub use ids::{LocationId, PlayerId, WorldId};
pub use value_objects::{LocationName, PlayerName};

/// Damage dealt by every attack.
pub const ATTACK_DAMAGE: u32 = 10;
