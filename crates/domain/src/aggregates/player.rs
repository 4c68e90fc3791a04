//! Player aggregate - a participant occupying exactly one location
//!
//! Players are created on join, mutated by move/attack and never deleted.
//! A defeated player stays queryable with health 0.

use serde::{Deserialize, Serialize};

use crate::events::DamageOutcome;
use crate::value_objects::PlayerName;
use crate::{LocationId, PlayerId};

/// Health every player starts with; also the maximum.
pub const STARTING_HEALTH: u32 = 100;

/// Optional combat attributes (3..=18, like a 3d6 roll).
///
/// Not consulted by the attack rules; carried for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u8,
    pub dexterity: u8,
}

/// A player in a world
///
/// # Invariants
///
/// - `health <= max_health`
/// - `location_id` references an existing location of the owning world
///   (enforced by the world state store, which is the only mutator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: PlayerName,
    location_id: LocationId,
    health: u32,
    max_health: u32,
    attributes: Attributes,
}

impl Player {
    /// Create a player at full health.
    pub fn new(id: PlayerId, name: PlayerName, location_id: LocationId) -> Self {
        Self {
            id,
            name,
            location_id,
            health: STARTING_HEALTH,
            max_health: STARTING_HEALTH,
            attributes: Attributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &PlayerName {
        &self.name
    }

    #[inline]
    pub fn location_id(&self) -> &LocationId {
        &self.location_id
    }

    #[inline]
    pub fn health(&self) -> u32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    #[inline]
    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Relocate the player, returning the previous location.
    ///
    /// Connectivity is validated by the caller, which owns the graph.
    pub fn relocate(&mut self, to: LocationId) -> LocationId {
        std::mem::replace(&mut self.location_id, to)
    }

    /// Apply damage, flooring health at zero.
    ///
    /// `Defeated` is reported only by the hit that takes health from above
    /// zero to zero; hits on an already defeated player report `Damaged`.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        let was_standing = self.health > 0;
        self.health = self.health.saturating_sub(amount);
        if was_standing && self.health == 0 {
            DamageOutcome::Defeated
        } else {
            DamageOutcome::Damaged {
                remaining: self.health,
            }
        }
    }
}
