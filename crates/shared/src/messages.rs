//! Event stream payloads
//!
//! Each `ServerEvent` is JSON-encoded into one SSE `data:` frame.
//!
//! ## Versioning Policy
//!
//! - New event types can be added (clients must ignore unknown `type`s)
//! - Renaming a field or a `type` tag is a breaking change

use serde::{Deserialize, Serialize};

/// One event pushed to a subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEvent {
    /// `player_joined`, `player_departed`, `player_arrived`, `player_attack`,
    /// `player_defeated` or `connected`
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    pub message: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}
