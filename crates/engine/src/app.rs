//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    ports::{ClockPort, RandomPort},
    settings::{EngineConfig, WorldConfig},
};
use crate::stores::{GameRegistry, SessionStore};
use crate::use_cases;

/// Main application state.
///
/// Holds the process-wide stores and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub games: Arc<GameRegistry>,
    pub sessions: Arc<SessionStore>,
    pub world_config: WorldConfig,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub lobby: use_cases::LobbyUseCases,
    pub actions: use_cases::ActionUseCases,
}

impl App {
    /// Compose the application with system clock and randomness.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_ports(
            config,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        )
    }

    pub fn with_ports(
        config: &EngineConfig,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let games = Arc::new(GameRegistry::new(
            config.world,
            Arc::clone(&clock),
            Arc::clone(&random),
        ));
        let sessions = Arc::new(SessionStore::new(config.session_ttl, clock, random));

        let use_cases = UseCases {
            lobby: use_cases::LobbyUseCases::new(Arc::clone(&games), Arc::clone(&sessions)),
            actions: use_cases::ActionUseCases::new(Arc::clone(&games)),
        };

        Self {
            games,
            sessions,
            world_config: config.world,
            use_cases,
        }
    }
}
