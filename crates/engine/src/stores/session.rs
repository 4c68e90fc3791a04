//! Session token storage.
//!
//! Issues opaque bearer tokens binding a caller to `(world, player)`. Tokens
//! expire after the configured TTL and are purged by a background task.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use wayfarer_domain::{PlayerId, WorldId};

use crate::infrastructure::ports::{ClockPort, RandomPort};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Missing authorization header")]
    MissingToken,
    #[error("Invalid authorization header format")]
    MalformedHeader,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Token not valid for this game")]
    WrongWorld,
}

/// What a valid token proves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub world_id: WorldId,
    pub player_id: PlayerId,
    pub expires_at: DateTime<Utc>,
}

/// In-memory token table.
pub struct SessionStore {
    sessions: DashMap<String, SessionClaims>,
    ttl: chrono::Duration,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl SessionStore {
    /// A TTL beyond what `chrono` can represent saturates: such tokens
    /// never expire.
    pub fn new(
        ttl: std::time::Duration,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
            random,
        }
    }

    /// Issue a token for `player_id` in `world_id`.
    pub fn issue(&self, world_id: WorldId, player_id: PlayerId) -> String {
        let token = self.random.gen_uuid().simple().to_string();
        let claims = SessionClaims {
            world_id,
            player_id,
            expires_at: self
                .clock
                .now()
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions.insert(token.clone(), claims);
        token
    }

    /// Check `token` and that it belongs to `world_id`.
    pub fn validate(&self, token: &str, world_id: &WorldId) -> Result<SessionClaims, SessionError> {
        let claims = self
            .sessions
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or(SessionError::InvalidToken)?;

        if claims.expires_at <= self.clock.now() {
            self.sessions.remove(token);
            return Err(SessionError::InvalidToken);
        }
        if &claims.world_id != world_id {
            return Err(SessionError::WrongWorld);
        }
        Ok(claims)
    }

    /// Drop every expired token. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.sessions.len();
        self.sessions.retain(|_, claims| claims.expires_at > now);
        before.saturating_sub(self.sessions.len())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
