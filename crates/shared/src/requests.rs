//! Request bodies sent by clients

use serde::{Deserialize, Serialize};

/// `POST /games/{game_id}/players`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlayerRequest {
    #[serde(default)]
    pub name: String,
}

/// `POST /games/{game_id}/actions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: ActionKind,
    /// Location ID for `move`, player ID for `attack`
    #[serde(default)]
    pub target: String,
}

/// Actions a player can perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Move,
    Attack,
    /// Unknown action for forward compatibility; rejected by the engine
    #[serde(other)]
    Unknown,
}
