//! Lobby use cases: create a game, join it, inspect it.

use std::sync::Arc;

use wayfarer_domain::{self as domain, DomainError, PlayerName, WorldError, WorldId};

use crate::entities::World;
use crate::stores::{GameRegistry, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    #[error("Game not found: {0}")]
    GameNotFound(WorldId),
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error(transparent)]
    World(#[from] WorldError),
}

/// A newly joined player and the bearer token bound to them.
#[derive(Debug, Clone)]
pub struct JoinedPlayer {
    pub player: domain::Player,
    pub token: String,
}

/// Read-only view of a whole world.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    pub world_id: WorldId,
    pub locations: Vec<domain::Location>,
    pub players: Vec<domain::Player>,
}

/// Generate and register a new world.
pub struct CreateGame {
    games: Arc<GameRegistry>,
}

impl CreateGame {
    pub fn new(games: Arc<GameRegistry>) -> Self {
        Self { games }
    }

    pub async fn execute(&self) -> GameSnapshot {
        let world = self.games.create();
        snapshot(&world).await
    }
}

/// Add a player to a world and issue their session token.
pub struct JoinGame {
    games: Arc<GameRegistry>,
    sessions: Arc<SessionStore>,
}

impl JoinGame {
    pub fn new(games: Arc<GameRegistry>, sessions: Arc<SessionStore>) -> Self {
        Self { games, sessions }
    }

    pub async fn execute(&self, world_id: &WorldId, name: String) -> Result<JoinedPlayer, LobbyError> {
        let world = self
            .games
            .get(world_id)
            .ok_or_else(|| LobbyError::GameNotFound(world_id.clone()))?;
        let name = PlayerName::new(name)?;

        let player = world.join(name).await?;
        let token = self.sessions.issue(world_id.clone(), player.id().clone());

        Ok(JoinedPlayer { player, token })
    }
}

/// Full state of one world.
pub struct GetGame {
    games: Arc<GameRegistry>,
}

impl GetGame {
    pub fn new(games: Arc<GameRegistry>) -> Self {
        Self { games }
    }

    pub async fn execute(&self, world_id: &WorldId) -> Result<GameSnapshot, LobbyError> {
        let world = self
            .games
            .get(world_id)
            .ok_or_else(|| LobbyError::GameNotFound(world_id.clone()))?;
        Ok(snapshot(&world).await)
    }
}

async fn snapshot(world: &World) -> GameSnapshot {
    GameSnapshot {
        world_id: world.id().clone(),
        locations: world.locations().await,
        players: world.players().await,
    }
}

/// Container for lobby use cases.
pub struct LobbyUseCases {
    pub create: CreateGame,
    pub join: JoinGame,
    pub get: GetGame,
}

impl LobbyUseCases {
    pub fn new(games: Arc<GameRegistry>, sessions: Arc<SessionStore>) -> Self {
        Self {
            create: CreateGame::new(Arc::clone(&games)),
            join: JoinGame::new(Arc::clone(&games), sessions),
            get: GetGame::new(games),
        }
    }
}
