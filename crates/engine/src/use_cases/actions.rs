//! Player action use cases: move, attack, and open an event stream.

use std::sync::Arc;

use wayfarer_domain::{GameEvent, LocationId, PlayerId, WorldError, WorldId};

use crate::entities::Subscription;
use crate::stores::GameRegistry;

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Game not found: {0}")]
    GameNotFound(WorldId),
    #[error(transparent)]
    World(#[from] WorldError),
}

/// An action a player asks to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    Move { target: LocationId },
    Attack { target: PlayerId },
}

/// Apply a player's action to its world.
pub struct PerformAction {
    games: Arc<GameRegistry>,
}

impl PerformAction {
    pub fn new(games: Arc<GameRegistry>) -> Self {
        Self { games }
    }

    /// Returns a human-readable confirmation.
    pub async fn execute(
        &self,
        world_id: &WorldId,
        player_id: &PlayerId,
        action: PlayerAction,
    ) -> Result<String, ActionError> {
        let world = self
            .games
            .get(world_id)
            .ok_or_else(|| ActionError::GameNotFound(world_id.clone()))?;

        match action {
            PlayerAction::Move { target } => {
                world.move_player(player_id, &target).await?;
                Ok(format!("Player moved to {}", target))
            }
            PlayerAction::Attack { target } => {
                world.attack(player_id, &target).await?;
                Ok("Attack executed".to_string())
            }
        }
    }
}

/// Subscribe a player to their world's events.
pub struct OpenEventStream {
    games: Arc<GameRegistry>,
}

impl OpenEventStream {
    pub fn new(games: Arc<GameRegistry>) -> Self {
        Self { games }
    }

    /// Returns the welcome event and the live subscription.
    pub async fn execute(
        &self,
        world_id: &WorldId,
        player_id: &PlayerId,
    ) -> Result<(GameEvent, Subscription), ActionError> {
        let world = self
            .games
            .get(world_id)
            .ok_or_else(|| ActionError::GameNotFound(world_id.clone()))?;

        let subscription = world.subscribe(player_id).await?;
        let welcome = world.connected_event(player_id).await?;
        tracing::debug!(
            world_id = %world_id,
            player_id = %player_id,
            subscription_id = %subscription.id(),
            "Event stream opened"
        );
        Ok((welcome, subscription))
    }
}

/// Container for action use cases.
pub struct ActionUseCases {
    pub perform: PerformAction,
    pub stream: OpenEventStream,
}

impl ActionUseCases {
    pub fn new(games: Arc<GameRegistry>) -> Self {
        Self {
            perform: PerformAction::new(Arc::clone(&games)),
            stream: OpenEventStream::new(games),
        }
    }
}
