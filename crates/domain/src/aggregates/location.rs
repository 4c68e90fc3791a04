//! Location aggregate - a node in the world graph
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: connections are only changed through `connect()`
//! - **Newtypes**: `LocationName` for the validated display name
//! - **Valid by construction**: `new()` takes pre-validated types
//!
//! Edges are undirected. A single `Location` only knows its own side of an
//! edge, so callers that link two locations must call `connect()` on both
//! (the graph generator does this).

use serde::{Deserialize, Serialize};

use crate::value_objects::LocationName;
use crate::LocationId;

/// A location in the world
///
/// # Invariants
///
/// - `connections` never contains `id` (no self-loop)
/// - `connections` never contains duplicates
///
/// # Example
///
/// ```
/// use wayfarer_domain::{Location, LocationId};
/// use wayfarer_domain::value_objects::LocationName;
///
/// let name = LocationName::new("Crystal Cave").unwrap();
/// let mut cave = Location::new(LocationId::new("cave"), name, "A mysterious Crystal Cave");
/// assert!(cave.connect(LocationId::new("lake")));
/// assert!(!cave.connect(LocationId::new("lake")));
/// assert!(cave.is_connected_to(&LocationId::new("lake")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    name: LocationName,
    description: String,
    /// Insertion-ordered set of neighbouring location IDs
    connections: Vec<LocationId>,
}

impl Location {
    pub fn new(id: LocationId, name: LocationName, description: impl Into<String>) -> Self {
        Self {
            id,
            name,
            description: description.into(),
            connections: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &LocationId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &LocationName {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn connections(&self) -> &[LocationId] {
        &self.connections
    }

    /// Whether `other` is a direct neighbour of this location.
    pub fn is_connected_to(&self, other: &LocationId) -> bool {
        self.connections.contains(other)
    }

    /// Whether a player standing here may move to `target`.
    ///
    /// Staying put is always allowed.
    pub fn can_reach(&self, target: &LocationId) -> bool {
        &self.id == target || self.is_connected_to(target)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Add `other` to this side of the edge.
    ///
    /// Returns `false` if the edge already existed or would be a self-loop.
    pub fn connect(&mut self, other: LocationId) -> bool {
        if other == self.id || self.connections.contains(&other) {
            return false;
        }
        self.connections.push(other);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: &str) -> Location {
        let name = LocationName::new(format!("Place {id}")).unwrap();
        Location::new(LocationId::new(id), name, format!("A mysterious Place {id}"))
    }

    #[test]
    fn new_location_has_no_connections() {
        let loc = location("a");
        assert_eq!(loc.id().as_str(), "a");
        assert_eq!(loc.name().as_str(), "Place a");
        assert_eq!(loc.description(), "A mysterious Place a");
        assert!(loc.connections().is_empty());
    }

    #[test]
    fn connect_rejects_self_loop_and_duplicates() {
        let mut loc = location("a");
        assert!(!loc.connect(LocationId::new("a")));
        assert!(loc.connect(LocationId::new("b")));
        assert!(!loc.connect(LocationId::new("b")));
        assert!(loc.connect(LocationId::new("c")));
        assert_eq!(
            loc.connections(),
            &[LocationId::new("b"), LocationId::new("c")]
        );
    }

    #[test]
    fn can_reach_self_and_neighbours_only() {
        let mut loc = location("a");
        loc.connect(LocationId::new("b"));

        assert!(loc.can_reach(&LocationId::new("a")));
        assert!(loc.can_reach(&LocationId::new("b")));
        assert!(!loc.can_reach(&LocationId::new("c")));
    }
}
