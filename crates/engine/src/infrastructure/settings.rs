//! Engine configuration

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Longest accepted session lifetime (ten years).
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365 * 10;

/// Engine configuration loaded from environment
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bind host
    pub server_host: String,
    /// Bind port
    pub server_port: u16,

    /// CORS allowed origins (comma-separated, or "*" for any). Empty disables CORS.
    pub cors_allowed_origins: Vec<String>,

    /// World tuning
    pub world: WorldConfig,

    /// Session token lifetime
    pub session_ttl: Duration,
}

/// Per-world settings applied to every new game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldConfig {
    /// Number of locations generated per world
    pub size: usize,
    /// Pending events each subscriber queue holds before eviction
    pub subscriber_queue_capacity: usize,
    /// Interval between SSE keepalive comments
    pub keepalive: Duration,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 10,
            subscriber_queue_capacity: 10,
            keepalive: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .context("SERVER_PORT must be a valid port number")?;

        let size: usize = parse_or(&lookup, "WORLD_SIZE", 10)
            .context("WORLD_SIZE must be a non-negative integer")?;
        if size == 0 {
            bail!("WORLD_SIZE must be at least 1");
        }

        let subscriber_queue_capacity: usize = parse_or(&lookup, "SUBSCRIBER_QUEUE_CAPACITY", 10)
            .context("SUBSCRIBER_QUEUE_CAPACITY must be a non-negative integer")?;
        if subscriber_queue_capacity == 0 {
            bail!("SUBSCRIBER_QUEUE_CAPACITY must be at least 1");
        }

        let keepalive_secs: u64 = parse_or(&lookup, "SSE_KEEPALIVE_SECS", 30)
            .context("SSE_KEEPALIVE_SECS must be a number of seconds")?;
        let ttl_hours: u64 = parse_or(&lookup, "SESSION_TTL_HOURS", 24)
            .context("SESSION_TTL_HOURS must be a number of hours")?;
        if ttl_hours == 0 || ttl_hours > MAX_SESSION_TTL_HOURS {
            bail!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            );
        }
        let ttl_secs = ttl_hours
            .checked_mul(3600)
            .context("SESSION_TTL_HOURS is too large")?;

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,

            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),

            world: WorldConfig {
                size,
                subscriber_queue_capacity,
                keepalive: Duration::from_secs(keepalive_secs.max(1)),
            },

            session_ttl: Duration::from_secs(ttl_secs),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => Ok(raw.trim().parse()?),
        None => Ok(default),
    }
}
