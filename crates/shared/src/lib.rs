//! Wayfarer Protocol - Wire-format types for the HTTP + SSE transport
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - identifiers travel as plain strings

pub mod messages;
pub mod requests;
pub mod responses;

pub use messages::ServerEvent;
pub use requests::{ActionKind, ActionRequest, CreatePlayerRequest};
pub use responses::{
    ActionResponse, CreateGameResponse, GameStateResponse, LocationData, PlayerCreatedResponse,
    PlayerData,
};
