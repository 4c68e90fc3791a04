//! World State Store - the locations and players of one world.
//!
//! Every mutation runs as a commit phase: acquire the write lock, validate,
//! mutate, build the resulting events, release. Events are returned to the
//! caller and never published from inside the lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use wayfarer_domain::{
    self as domain, Attributes, DamageOutcome, GameEvent, LocationId, PlayerId, PlayerName,
    WorldError, WorldGraph, ATTACK_DAMAGE,
};

use crate::infrastructure::ports::{ClockPort, RandomPort};

/// Length of generated player identifiers.
pub const PLAYER_ID_LEN: usize = 6;

/// Attribute rolls are uniform in this inclusive range.
const ATTRIBUTE_MIN: i32 = 3;
const ATTRIBUTE_MAX: i32 = 18;

const MAX_ID_ATTEMPTS: usize = 16;

/// Who is where, captured under a brief read lock.
pub type LocationSnapshot = HashMap<PlayerId, LocationId>;

#[derive(Debug, Default)]
struct WorldState {
    locations: HashMap<LocationId, domain::Location>,
    order: Vec<LocationId>,
    players: HashMap<PlayerId, domain::Player>,
}

/// Result of a committed move.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub player: domain::Player,
    pub from: LocationId,
    pub events: Vec<GameEvent>,
}

/// Result of a committed attack.
#[derive(Debug, Clone)]
pub struct AttackOutcome {
    pub target: domain::Player,
    pub damage: DamageOutcome,
    pub events: Vec<GameEvent>,
}

/// Owns the mutable maps of one world behind a single `RwLock`.
pub struct WorldStateStore {
    state: RwLock<WorldState>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl WorldStateStore {
    pub fn new(graph: WorldGraph, clock: Arc<dyn ClockPort>, random: Arc<dyn RandomPort>) -> Self {
        let (locations, order) = graph.into_parts();
        Self {
            state: RwLock::new(WorldState {
                locations,
                order,
                players: HashMap::new(),
            }),
            clock,
            random,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Place a new player on a uniformly random location.
    ///
    /// Produces one global `player_joined` event.
    pub async fn join(&self, name: PlayerName) -> Result<(domain::Player, GameEvent), WorldError> {
        let mut state = self.state.write().await;

        if state.order.is_empty() {
            return Err(WorldError::NoLocationsAvailable);
        }
        let index = self.random.gen_index(state.order.len()) % state.order.len();
        let start = state.order[index].clone();
        let id = self.unique_player_id(&state);
        let attributes = Attributes {
            strength: self.roll_attribute(),
            dexterity: self.roll_attribute(),
        };

        let player = domain::Player::new(id.clone(), name, start).with_attributes(attributes);
        let event = GameEvent::player_joined(&player, self.clock.now());
        state.players.insert(id, player.clone());

        Ok((player, event))
    }

    /// Move a player to `target`, which must neighbour its current location
    /// or be the current location itself.
    ///
    /// Produces a departure event scoped to the old location followed by an
    /// arrival event scoped to the new one.
    pub async fn move_player(
        &self,
        player_id: &PlayerId,
        target: &LocationId,
    ) -> Result<MoveOutcome, WorldError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let player = state
            .players
            .get_mut(player_id)
            .ok_or_else(|| WorldError::PlayerNotFound(player_id.clone()))?;
        let to = state
            .locations
            .get(target)
            .ok_or_else(|| WorldError::LocationNotFound(target.clone()))?;
        let from = state
            .locations
            .get(player.location_id())
            .ok_or_else(|| WorldError::LocationNotFound(player.location_id().clone()))?;

        if !from.can_reach(target) {
            return Err(WorldError::NotConnected {
                from: from.id().clone(),
                to: target.clone(),
            });
        }

        player.relocate(target.clone());

        let now = self.clock.now();
        let events = vec![
            GameEvent::player_departed(player, from, now),
            GameEvent::player_arrived(player, to, now),
        ];

        Ok(MoveOutcome {
            player: player.clone(),
            from: from.id().clone(),
            events,
        })
    }

    /// Apply `ATTACK_DAMAGE` from `attacker_id` to `target_id`.
    ///
    /// Produces an attack event scoped to the shared location, plus a defeat
    /// event when this hit takes the target to zero health.
    pub async fn attack(
        &self,
        attacker_id: &PlayerId,
        target_id: &PlayerId,
    ) -> Result<AttackOutcome, WorldError> {
        let mut state = self.state.write().await;

        let attacker = state
            .players
            .get(attacker_id)
            .cloned()
            .ok_or_else(|| WorldError::PlayerNotFound(attacker_id.clone()))?;
        let target = state
            .players
            .get_mut(target_id)
            .ok_or_else(|| WorldError::PlayerNotFound(target_id.clone()))?;

        if attacker.location_id() != target.location_id() {
            return Err(WorldError::NotCoLocated {
                attacker: attacker_id.clone(),
                target: target_id.clone(),
            });
        }

        let damage = target.apply_damage(ATTACK_DAMAGE);

        let now = self.clock.now();
        let mut events = vec![GameEvent::player_attacked(&attacker, target, ATTACK_DAMAGE, now)];
        if damage.is_defeat() {
            events.push(GameEvent::player_defeated(target, now));
        }

        Ok(AttackOutcome {
            target: target.clone(),
            damage,
            events,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn player(&self, id: &PlayerId) -> Option<domain::Player> {
        self.state.read().await.players.get(id).cloned()
    }

    pub async fn location(&self, id: &LocationId) -> Option<domain::Location> {
        self.state.read().await.locations.get(id).cloned()
    }

    /// The location a player currently occupies.
    pub async fn location_of(&self, player_id: &PlayerId) -> Result<domain::Location, WorldError> {
        let state = self.state.read().await;
        let player = state
            .players
            .get(player_id)
            .ok_or_else(|| WorldError::PlayerNotFound(player_id.clone()))?;
        state
            .locations
            .get(player.location_id())
            .cloned()
            .ok_or_else(|| WorldError::LocationNotFound(player.location_id().clone()))
    }

    /// All locations in generation order.
    pub async fn locations(&self) -> Vec<domain::Location> {
        let state = self.state.read().await;
        state
            .order
            .iter()
            .filter_map(|id| state.locations.get(id).cloned())
            .collect()
    }

    /// All players, sorted by ID for stable output.
    pub async fn players(&self) -> Vec<domain::Player> {
        let state = self.state.read().await;
        let mut players: Vec<_> = state.players.values().cloned().collect();
        players.sort_by(|a, b| a.id().cmp(b.id()));
        players
    }

    /// Capture every player's current location.
    ///
    /// The read lock is released before this returns.
    pub async fn location_snapshot(&self) -> LocationSnapshot {
        let state = self.state.read().await;
        state
            .players
            .iter()
            .map(|(id, player)| (id.clone(), player.location_id().clone()))
            .collect()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn unique_player_id(&self, state: &WorldState) -> PlayerId {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = PlayerId::new(self.random.gen_id(PLAYER_ID_LEN));
            if !state.players.contains_key(&candidate) {
                return candidate;
            }
        }
        PlayerId::new(format!(
            "{}-{}",
            self.random.gen_id(PLAYER_ID_LEN),
            state.players.len()
        ))
    }

    fn roll_attribute(&self) -> u8 {
        self.random
            .gen_range(ATTRIBUTE_MIN, ATTRIBUTE_MAX)
            .clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX) as u8
    }
}
