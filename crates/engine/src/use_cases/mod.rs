//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area. Use cases look up
//! the target world in the registry and drive it.

pub mod actions;
pub mod lobby;

pub use actions::{ActionError, ActionUseCases, PlayerAction};
pub use lobby::{GameSnapshot, JoinedPlayer, LobbyError, LobbyUseCases};
