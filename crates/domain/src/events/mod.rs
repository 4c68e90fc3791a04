//! Game Events
//!
//! Immutable records of what a world mutation did. Each event carries its
//! own visibility scope; the broadcaster uses the scope to pick recipients.
//! Events hold IDs and rendered text only, never references into the store.
//!
//! ## Aggregate Mutation Outcomes
//!
//! `combat_events` contains return types from aggregate mutations,
//! communicating what happened when state was modified.

pub mod combat_events;

pub use combat_events::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Location, LocationId, Player, PlayerId};

/// Type tag of a game event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEventType {
    PlayerJoined,
    PlayerDeparted,
    PlayerArrived,
    #[serde(rename = "player_attack")]
    PlayerAttacked,
    PlayerDefeated,
    /// System message sent to a subscriber when its stream opens
    Connected,
}

impl GameEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayerJoined => "player_joined",
            Self::PlayerDeparted => "player_departed",
            Self::PlayerArrived => "player_arrived",
            Self::PlayerAttacked => "player_attack",
            Self::PlayerDefeated => "player_defeated",
            Self::Connected => "connected",
        }
    }
}

/// Who gets to see an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location_id", rename_all = "snake_case")]
pub enum EventScope {
    /// Every subscriber
    Global,
    /// Only subscribers whose player currently occupies the location
    Location(LocationId),
}

impl EventScope {
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

/// A single game event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    event_type: GameEventType,
    player_id: Option<PlayerId>,
    target_id: Option<PlayerId>,
    location_id: Option<LocationId>,
    message: String,
    timestamp: DateTime<Utc>,
    scope: EventScope,
}

impl GameEvent {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Global announcement of a new player.
    pub fn player_joined(player: &Player, now: DateTime<Utc>) -> Self {
        Self {
            event_type: GameEventType::PlayerJoined,
            player_id: Some(player.id().clone()),
            target_id: None,
            location_id: Some(player.location_id().clone()),
            message: format!("{} joined the game", player.name()),
            timestamp: now,
            scope: EventScope::Global,
        }
    }

    /// Seen by the location the player left.
    pub fn player_departed(player: &Player, from: &Location, now: DateTime<Utc>) -> Self {
        Self::location_scoped(
            GameEventType::PlayerDeparted,
            Some(player.id().clone()),
            None,
            from.id().clone(),
            format!("{} left {}", player.name(), from.name()),
            now,
        )
    }

    /// Seen by the location the player entered.
    pub fn player_arrived(player: &Player, to: &Location, now: DateTime<Utc>) -> Self {
        Self::location_scoped(
            GameEventType::PlayerArrived,
            Some(player.id().clone()),
            None,
            to.id().clone(),
            format!("{} arrived at {}", player.name(), to.name()),
            now,
        )
    }

    pub fn player_attacked(
        attacker: &Player,
        target: &Player,
        damage: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self::location_scoped(
            GameEventType::PlayerAttacked,
            Some(attacker.id().clone()),
            Some(target.id().clone()),
            attacker.location_id().clone(),
            format!(
                "{} attacked {} for {} damage",
                attacker.name(),
                target.name(),
                damage
            ),
            now,
        )
    }

    pub fn player_defeated(target: &Player, now: DateTime<Utc>) -> Self {
        Self::location_scoped(
            GameEventType::PlayerDefeated,
            Some(target.id().clone()),
            None,
            target.location_id().clone(),
            format!("{} has been defeated!", target.name()),
            now,
        )
    }

    /// Welcome message for a freshly opened stream.
    ///
    /// Delivered directly to one subscriber, never broadcast.
    pub fn connected(location: &Location, now: DateTime<Utc>) -> Self {
        Self::location_scoped(
            GameEventType::Connected,
            None,
            None,
            location.id().clone(),
            format!("Connected to game. You are in {}", location.name()),
            now,
        )
    }

    fn location_scoped(
        event_type: GameEventType,
        player_id: Option<PlayerId>,
        target_id: Option<PlayerId>,
        location_id: LocationId,
        message: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type,
            player_id,
            target_id,
            location_id: Some(location_id.clone()),
            message,
            timestamp: now,
            scope: EventScope::Location(location_id),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn event_type(&self) -> GameEventType {
        self.event_type
    }

    #[inline]
    pub fn player_id(&self) -> Option<&PlayerId> {
        self.player_id.as_ref()
    }

    #[inline]
    pub fn target_id(&self) -> Option<&PlayerId> {
        self.target_id.as_ref()
    }

    #[inline]
    pub fn location_id(&self) -> Option<&LocationId> {
        self.location_id.as_ref()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    pub fn scope(&self) -> &EventScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{LocationName, PlayerName};

    fn fixture() -> (Player, Player, Location, Location) {
        let here = LocationId::new("cave");
        let attacker = Player::new(
            PlayerId::new("p1"),
            PlayerName::new("Boromir").unwrap(),
            here.clone(),
        );
        let target = Player::new(
            PlayerId::new("p2"),
            PlayerName::new("Gollum").unwrap(),
            here.clone(),
        );
        let cave = Location::new(here, LocationName::new("Crystal Cave").unwrap(), "");
        let lake = Location::new(
            LocationId::new("lake"),
            LocationName::new("Frozen Lake").unwrap(),
            "",
        );
        (attacker, target, cave, lake)
    }

    #[test]
    fn join_is_global() {
        let (attacker, _, _, _) = fixture();
        let event = GameEvent::player_joined(&attacker, Utc::now());

        assert_eq!(event.event_type(), GameEventType::PlayerJoined);
        assert!(event.scope().is_global());
        assert_eq!(event.message(), "Boromir joined the game");
        assert_eq!(event.player_id(), Some(&PlayerId::new("p1")));
    }

    #[test]
    fn movement_events_are_scoped_to_their_own_location() {
        let (player, _, cave, lake) = fixture();
        let now = Utc::now();

        let departed = GameEvent::player_departed(&player, &cave, now);
        let arrived = GameEvent::player_arrived(&player, &lake, now);

        assert_eq!(departed.scope(), &EventScope::Location(LocationId::new("cave")));
        assert_eq!(arrived.scope(), &EventScope::Location(LocationId::new("lake")));
        assert_eq!(departed.message(), "Boromir left Crystal Cave");
        assert_eq!(arrived.message(), "Boromir arrived at Frozen Lake");
    }

    #[test]
    fn attack_names_both_players() {
        let (attacker, target, _, _) = fixture();
        let event = GameEvent::player_attacked(&attacker, &target, 10, Utc::now());

        assert_eq!(event.target_id(), Some(&PlayerId::new("p2")));
        assert_eq!(event.message(), "Boromir attacked Gollum for 10 damage");
        assert_eq!(event.scope(), &EventScope::Location(LocationId::new("cave")));
    }

    #[test]
    fn event_type_serializes_to_wire_tag() {
        for ty in [
            GameEventType::PlayerJoined,
            GameEventType::PlayerDeparted,
            GameEventType::PlayerArrived,
            GameEventType::PlayerAttacked,
            GameEventType::PlayerDefeated,
            GameEventType::Connected,
        ] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }
}
