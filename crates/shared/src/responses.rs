//! Response bodies returned by the HTTP API

use serde::{Deserialize, Serialize};

/// A location as seen by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub connections: Vec<String>,
}

/// A player as seen by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    pub id: String,
    pub name: String,
    pub current_location: String,
    pub health: u32,
    pub strength: u8,
    pub dexterity: u8,
}

/// `POST /games`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub game_id: String,
    pub locations: Vec<LocationData>,
    pub message: String,
}

/// `GET /games/{game_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub game_id: String,
    pub locations: Vec<LocationData>,
    pub players: Vec<PlayerData>,
}

/// `POST /games/{game_id}/players`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCreatedResponse {
    pub player: PlayerData,
    /// Bearer token for the actions and events endpoints
    pub token: String,
    pub message: String,
}

/// `POST /games/{game_id}/actions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    pub message: String,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}
