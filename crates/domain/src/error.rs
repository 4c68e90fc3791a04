//! Error types for the domain layer
//!
//! `DomainError` covers value-object validation. `WorldError` is returned by
//! every world mutation and query; `ErrorKind` classifies it for callers
//! (the transport maps kinds onto status codes).

use thiserror::Error;

use crate::{LocationId, PlayerId};

/// Validation errors raised when constructing value objects
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Coarse error classification shared by all world operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown player or location identifier
    NotFound,
    /// Move target is not connected to the current location
    InvalidTransition,
    /// Attacker and target are not co-located
    StateConflict,
    /// No locations available at join time
    ResourceExhausted,
}

/// Failure of a world mutation or lookup.
///
/// All variants are returned synchronously and never retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("location not found: {0}")]
    LocationNotFound(LocationId),

    #[error("location {to} is not connected to {from}")]
    NotConnected { from: LocationId, to: LocationId },

    #[error("players {attacker} and {target} are not in the same location")]
    NotCoLocated { attacker: PlayerId, target: PlayerId },

    #[error("no locations available")]
    NoLocationsAvailable,
}

impl WorldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PlayerNotFound(_) | Self::LocationNotFound(_) => ErrorKind::NotFound,
            Self::NotConnected { .. } => ErrorKind::InvalidTransition,
            Self::NotCoLocated { .. } => ErrorKind::StateConflict,
            Self::NoLocationsAvailable => ErrorKind::ResourceExhausted,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
