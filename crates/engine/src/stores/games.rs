//! Game registry - every live world, by ID.

use std::sync::Arc;

use dashmap::DashMap;
use wayfarer_domain::WorldId;

use crate::entities::{World, WORLD_ID_LEN};
use crate::infrastructure::ports::{ClockPort, RandomPort};
use crate::infrastructure::settings::WorldConfig;

const MAX_ID_ATTEMPTS: usize = 16;

/// Process-wide map of `WorldId -> World`.
pub struct GameRegistry {
    games: DashMap<WorldId, Arc<World>>,
    config: WorldConfig,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl GameRegistry {
    pub fn new(config: WorldConfig, clock: Arc<dyn ClockPort>, random: Arc<dyn RandomPort>) -> Self {
        Self {
            games: DashMap::new(),
            config,
            clock,
            random,
        }
    }

    /// Generate and register a new world.
    pub fn create(&self) -> Arc<World> {
        let id = self.unique_id();
        let world = Arc::new(World::generate(
            id.clone(),
            self.config.size,
            self.config.subscriber_queue_capacity,
            Arc::clone(&self.clock),
            Arc::clone(&self.random),
        ));
        self.games.insert(id, Arc::clone(&world));
        world
    }

    pub fn get(&self, id: &WorldId) -> Option<Arc<World>> {
        self.games.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Unregister a world. Tokens bound to it fail the game lookup from now
    /// on and are purged once expired.
    pub fn remove(&self, id: &WorldId) -> Option<Arc<World>> {
        let removed = self.games.remove(id).map(|(_, world)| world);
        if removed.is_some() {
            tracing::info!(world_id = %id, "World removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn unique_id(&self) -> WorldId {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = WorldId::new(self.random.gen_id(WORLD_ID_LEN));
            if !self.games.contains_key(&candidate) {
                return candidate;
            }
        }
        WorldId::new(format!(
            "{}-{}",
            self.random.gen_id(WORLD_ID_LEN),
            self.games.len()
        ))
    }
}
