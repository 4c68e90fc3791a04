//! World graph generation
//!
//! Builds the random location graph once per world, before any player
//! exists. The generator is pure: randomness and identifiers come in through
//! closures so the engine can inject its `RandomPort` and tests can script
//! every draw.

use std::collections::HashMap;

use crate::value_objects::LocationName;
use crate::{Location, LocationId};

/// Display names handed out in order, cycling once exhausted.
pub const LOCATION_NAMES: [&str; 12] = [
    "Dark Forest",
    "Ancient Castle",
    "Misty Mountains",
    "Crystal Cave",
    "Desert Ruins",
    "Frozen Lake",
    "Abandoned Mine",
    "Haunted Graveyard",
    "Dragon's Lair",
    "Enchanted Garden",
    "Pirate Cove",
    "Volcano Peak",
];

/// Outgoing link draws per location are uniform in `1..=MAX_LINKS_PER_LOCATION`.
pub const MAX_LINKS_PER_LOCATION: usize = 3;

/// Fresh IDs requested before falling back to an index suffix.
const MAX_ID_ATTEMPTS: usize = 16;

/// A generated world graph.
///
/// `order` is the fixed enumeration order used by the ring fallback; it is
/// also a stable order for uniform random picks.
#[derive(Debug, Clone, Default)]
pub struct WorldGraph {
    locations: HashMap<LocationId, Location>,
    order: Vec<LocationId>,
}

impl WorldGraph {
    /// Assemble a graph from prebuilt locations, keeping their order.
    ///
    /// Connections are taken as given; later duplicates of an ID are dropped.
    pub fn from_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        let mut graph = Self::default();
        for location in locations {
            if graph.locations.contains_key(location.id()) {
                continue;
            }
            graph.order.push(location.id().clone());
            graph.locations.insert(location.id().clone(), location);
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &LocationId) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Locations in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.order.iter().filter_map(|id| self.locations.get(id))
    }

    pub fn into_parts(self) -> (HashMap<LocationId, Location>, Vec<LocationId>) {
        (self.locations, self.order)
    }

    fn link(&mut self, a: usize, b: usize) {
        let (id_a, id_b) = (self.order[a].clone(), self.order[b].clone());
        if let Some(loc) = self.locations.get_mut(&id_a) {
            loc.connect(id_b.clone());
        }
        if let Some(loc) = self.locations.get_mut(&id_b) {
            loc.connect(id_a);
        }
    }

    fn degree(&self, index: usize) -> usize {
        self.locations
            .get(&self.order[index])
            .map_or(0, |loc| loc.connections().len())
    }
}

/// Name for the `index`-th generated location.
pub fn location_name(index: usize) -> String {
    let base = LOCATION_NAMES[index % LOCATION_NAMES.len()];
    if index >= LOCATION_NAMES.len() {
        format!("{} {}", base, index / LOCATION_NAMES.len())
    } else {
        base.to_string()
    }
}

/// Generate a world graph of `count` locations.
///
/// * `next_id` - supplies opaque identifiers; collisions are retried
/// * `roll` - returns a uniform integer in `0..n` for the given `n >= 1`
///
/// Every location ends up with at least one (undirected) connection unless
/// `count == 1`.
pub fn generate_world_graph(
    count: usize,
    mut next_id: impl FnMut() -> LocationId,
    mut roll: impl FnMut(usize) -> usize,
) -> WorldGraph {
    let mut graph = WorldGraph {
        locations: HashMap::with_capacity(count),
        order: Vec::with_capacity(count),
    };

    for index in 0..count {
        let id = unique_id(&graph, index, &mut next_id);
        let name = location_name(index);
        let description = format!("A mysterious {}", name);
        let location = Location::new(id.clone(), LocationName::from_pool(name), description);
        graph.locations.insert(id.clone(), location);
        graph.order.push(id);
    }

    for index in 0..count {
        let links = roll(MAX_LINKS_PER_LOCATION) + 1;
        for _ in 0..links {
            let target = roll(count);
            if target != index && target < count {
                graph.link(index, target);
            }
        }
    }

    // Ring fallback: guarantees connectivity whatever the draws were
    if count > 1 {
        for index in 0..count {
            if graph.degree(index) == 0 {
                graph.link(index, (index + 1) % count);
            }
        }
    }

    graph
}

fn unique_id(
    graph: &WorldGraph,
    index: usize,
    next_id: &mut impl FnMut() -> LocationId,
) -> LocationId {
    let mut candidate = next_id();
    for _ in 1..MAX_ID_ATTEMPTS {
        if !graph.locations.contains_key(&candidate) {
            return candidate;
        }
        candidate = next_id();
    }
    if graph.locations.contains_key(&candidate) {
        candidate = LocationId::new(format!("{}-{}", candidate, index));
    }
    candidate
}
