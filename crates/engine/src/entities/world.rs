//! World aggregate - one game session.
//!
//! Composes the state store, the subscription registry and the broadcaster.
//! Every mutation commits against the store, releases its lock, then
//! publishes the resulting events.

use std::sync::Arc;

use wayfarer_domain::{
    self as domain, generate_world_graph, GameEvent, LocationId, PlayerId, PlayerName, WorldError,
    WorldGraph, WorldId,
};

use super::broadcast::Broadcaster;
use super::subscriptions::{Subscription, SubscriptionRegistry};
use super::world_state::{AttackOutcome, MoveOutcome, WorldStateStore};
use crate::infrastructure::ports::{ClockPort, RandomPort};

/// Length of generated world and location identifiers.
pub const WORLD_ID_LEN: usize = 8;

pub struct World {
    id: WorldId,
    state: Arc<WorldStateStore>,
    subscriptions: Arc<SubscriptionRegistry>,
    broadcaster: Broadcaster,
    clock: Arc<dyn ClockPort>,
}

impl World {
    /// Generate a fresh world of `size` locations.
    pub fn generate(
        id: WorldId,
        size: usize,
        queue_capacity: usize,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let graph = generate_world_graph(
            size,
            || LocationId::new(random.gen_id(WORLD_ID_LEN)),
            |n| random.gen_index(n),
        );
        tracing::info!(world_id = %id, locations = graph.len(), "World generated");
        Self::from_graph(id, graph, queue_capacity, clock, random)
    }

    /// Build a world over an existing graph.
    pub fn from_graph(
        id: WorldId,
        graph: WorldGraph,
        queue_capacity: usize,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let state = Arc::new(WorldStateStore::new(graph, Arc::clone(&clock), random));
        let subscriptions = SubscriptionRegistry::new(queue_capacity);
        let broadcaster = Broadcaster::new(Arc::clone(&state), Arc::clone(&subscriptions));
        Self {
            id,
            state,
            subscriptions,
            broadcaster,
            clock,
        }
    }

    #[inline]
    pub fn id(&self) -> &WorldId {
        &self.id
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn join(&self, name: PlayerName) -> Result<domain::Player, WorldError> {
        let (player, event) = self.state.join(name).await?;
        tracing::info!(
            world_id = %self.id,
            player_id = %player.id(),
            location_id = %player.location_id(),
            "Player joined"
        );
        self.broadcaster.broadcast(&event).await;
        Ok(player)
    }

    pub async fn move_player(
        &self,
        player_id: &PlayerId,
        target: &LocationId,
    ) -> Result<MoveOutcome, WorldError> {
        let outcome = self.state.move_player(player_id, target).await?;
        tracing::debug!(
            world_id = %self.id,
            player_id = %player_id,
            from = %outcome.from,
            to = %target,
            "Player moved"
        );
        self.broadcaster.publish(&outcome.events).await;
        Ok(outcome)
    }

    pub async fn attack(
        &self,
        attacker_id: &PlayerId,
        target_id: &PlayerId,
    ) -> Result<AttackOutcome, WorldError> {
        let outcome = self.state.attack(attacker_id, target_id).await?;
        tracing::debug!(
            world_id = %self.id,
            attacker_id = %attacker_id,
            target_id = %target_id,
            remaining = outcome.target.health(),
            "Attack resolved"
        );
        self.broadcaster.publish(&outcome.events).await;
        Ok(outcome)
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Open a delivery queue for `player_id`.
    ///
    /// Fails if the player does not exist in this world.
    pub async fn subscribe(&self, player_id: &PlayerId) -> Result<Subscription, WorldError> {
        if self.state.player(player_id).await.is_none() {
            return Err(WorldError::PlayerNotFound(player_id.clone()));
        }
        Ok(self.subscriptions.subscribe(player_id.clone()))
    }

    pub fn unsubscribe(&self, subscription: &mut Subscription) {
        subscription.unsubscribe();
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Welcome event for a freshly opened stream, built from the player's
    /// current location.
    pub async fn connected_event(&self, player_id: &PlayerId) -> Result<GameEvent, WorldError> {
        let location = self.state.location_of(player_id).await?;
        Ok(GameEvent::connected(&location, self.clock.now()))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn player(&self, id: &PlayerId) -> Result<domain::Player, WorldError> {
        self.state
            .player(id)
            .await
            .ok_or_else(|| WorldError::PlayerNotFound(id.clone()))
    }

    pub async fn location(&self, id: &LocationId) -> Result<domain::Location, WorldError> {
        self.state
            .location(id)
            .await
            .ok_or_else(|| WorldError::LocationNotFound(id.clone()))
    }

    pub async fn locations(&self) -> Vec<domain::Location> {
        self.state.locations().await
    }

    pub async fn players(&self) -> Vec<domain::Player> {
        self.state.players().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::subscriptions::SubscriptionStatus;
    use crate::entities::world_state::tests::line_graph;
    use crate::infrastructure::clock::{FixedClock, FixedRandom, SystemClock, SystemRandom};
    use chrono::Utc;
    use std::time::Duration;
    use wayfarer_domain::{EventScope, GameEventType};

    /// World over A - B - C where every join lands on B.
    fn world(capacity: usize) -> World {
        World::from_graph(
            WorldId::new("w1"),
            line_graph(),
            capacity,
            Arc::new(FixedClock(Utc::now())),
            Arc::new(FixedRandom::new(1)),
        )
    }

    fn name(name: &str) -> PlayerName {
        PlayerName::new(name).unwrap()
    }

    fn loc(id: &str) -> LocationId {
        LocationId::new(id)
    }

    /// Collect everything already queued on `sub`.
    async fn drain(sub: &mut Subscription) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(20), sub.recv()).await
        {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn generated_world_is_connected() {
        let world = World::generate(
            WorldId::new("gen"),
            10,
            10,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        );
        let locations = world.locations().await;
        assert_eq!(locations.len(), 10);
        for location in &locations {
            assert!(!location.connections().is_empty());
            assert_eq!(location.id().as_str().len(), WORLD_ID_LEN);
        }
    }

    #[tokio::test]
    async fn scoped_events_reach_only_that_location() {
        let world = world(10);
        let watcher = world.join(name("Watcher")).await.unwrap();
        let walker = world.join(name("Walker")).await.unwrap();
        let mut watcher_sub = world.subscribe(watcher.id()).await.unwrap();

        // Watcher leaves B for C before the walker moves B -> A
        world.move_player(watcher.id(), &loc("C")).await.unwrap();
        drain(&mut watcher_sub).await;

        world.move_player(walker.id(), &loc("A")).await.unwrap();
        assert!(drain(&mut watcher_sub).await.is_empty());

        // A global join is seen from anywhere
        world.join(name("Latecomer")).await.unwrap();
        let seen = drain(&mut watcher_sub).await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].event_type(), GameEventType::PlayerJoined);
    }

    #[tokio::test]
    async fn mover_sees_arrival_but_not_departure() {
        let world = world(10);
        let stayer = world.join(name("Stayer")).await.unwrap();
        let mover = world.join(name("Mover")).await.unwrap();
        let mut stayer_sub = world.subscribe(stayer.id()).await.unwrap();
        let mut mover_sub = world.subscribe(mover.id()).await.unwrap();

        world.move_player(mover.id(), &loc("A")).await.unwrap();

        let stayer_seen = drain(&mut stayer_sub).await;
        assert_eq!(stayer_seen.len(), 1);
        assert_eq!(stayer_seen[0].event_type(), GameEventType::PlayerDeparted);

        let mover_seen = drain(&mut mover_sub).await;
        assert_eq!(mover_seen.len(), 1);
        assert_eq!(mover_seen[0].event_type(), GameEventType::PlayerArrived);
        assert_eq!(mover_seen[0].scope(), &EventScope::Location(loc("A")));
    }

    #[tokio::test]
    async fn defeat_is_broadcast_once() {
        let world = world(32);
        let attacker = world.join(name("Attacker")).await.unwrap();
        let target = world.join(name("Target")).await.unwrap();
        let mut sub = world.subscribe(target.id()).await.unwrap();

        for _ in 0..11 {
            world.attack(attacker.id(), target.id()).await.unwrap();
        }

        let seen = drain(&mut sub).await;
        let defeats = seen
            .iter()
            .filter(|e| e.event_type() == GameEventType::PlayerDefeated)
            .count();
        assert_eq!(defeats, 1);
        assert_eq!(seen.len(), 12);
        assert_eq!(world.player(target.id()).await.unwrap().health(), 0);
    }

    #[tokio::test]
    async fn slow_subscriber_is_evicted_and_world_progresses() {
        let world = world(2);
        let player = world.join(name("Idle")).await.unwrap();
        let mut idle = world.subscribe(player.id()).await.unwrap();

        for _ in 0..5 {
            world.move_player(player.id(), &loc("B")).await.unwrap();
        }

        assert_eq!(idle.status(), SubscriptionStatus::Evicted);
        assert_eq!(world.subscriber_count(), 0);
        assert_eq!(drain(&mut idle).await.len(), 2);
    }

    #[tokio::test]
    async fn subscribe_requires_known_player() {
        let world = world(4);
        let err = world.subscribe(&PlayerId::new("ghost")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn connected_event_names_current_location() {
        let world = world(4);
        let player = world.join(name("Greeter")).await.unwrap();
        let event = world.connected_event(player.id()).await.unwrap();

        assert_eq!(event.event_type(), GameEventType::Connected);
        assert_eq!(event.message(), "Connected to game. You are in Ancient Castle");
        assert_eq!(event.location_id(), Some(&loc("B")));

        let here = world.location(&loc("B")).await.unwrap();
        assert!(here.is_connected_to(&loc("C")));
        assert!(world.location(&loc("Z")).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let world = world(4);
        let player = world.join(name("Quitter")).await.unwrap();
        let mut sub = world.subscribe(player.id()).await.unwrap();

        world.unsubscribe(&mut sub);
        world.unsubscribe(&mut sub);
        world.join(name("Other")).await.unwrap();

        assert_eq!(sub.status(), SubscriptionStatus::Removed);
        assert_eq!(sub.recv().await, None);
        assert_eq!(world.subscriber_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_mutators_and_subscribers_do_not_deadlock() {
        let world = Arc::new(World::from_graph(
            WorldId::new("stress"),
            line_graph(),
            4,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        ));

        let mut players = Vec::new();
        for n in 0..8 {
            players.push(world.join(name(&format!("P{n}"))).await.unwrap());
        }

        let mut tasks = tokio::task::JoinSet::new();
        for (n, player) in players.iter().enumerate() {
            let world = Arc::clone(&world);
            let id = player.id().clone();
            let other = players[(n + 1) % players.len()].id().clone();
            tasks.spawn(async move {
                for round in 0..200 {
                    let target = ["A", "B", "C"][(n + round) % 3];
                    let _ = world.move_player(&id, &LocationId::new(target)).await;
                    let _ = world.attack(&id, &other).await;
                    if round % 10 == 0 {
                        let mut sub = world.subscribe(&id).await.unwrap();
                        let _ = tokio::time::timeout(Duration::from_millis(1), sub.recv()).await;
                        drop(sub);
                    }
                }
            });
        }
        for player in players.iter().take(3) {
            let world = Arc::clone(&world);
            let id = player.id().clone();
            tasks.spawn(async move {
                let mut sub = world.subscribe(&id).await.unwrap();
                for _ in 0..100 {
                    if tokio::time::timeout(Duration::from_millis(5), sub.recv())
                        .await
                        .is_ok_and(|event| event.is_none())
                    {
                        break;
                    }
                }
            });
        }

        let finished = tokio::time::timeout(Duration::from_secs(30), async {
            while let Some(result) = tasks.join_next().await {
                result.unwrap();
            }
        })
        .await;
        assert!(finished.is_ok(), "world operations deadlocked");
    }
}
