//! Port traits for infrastructure boundaries.
//!
//! Clock and randomness are the only abstractions in the engine; everything
//! else is a concrete type. Both exist so tests can pin time and script
//! every random draw.

use chrono::{DateTime, Utc};
use uuid::Uuid;

// =============================================================================
// Testing Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `min..=max`.
    fn gen_range(&self, min: i32, max: i32) -> i32;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn gen_index(&self, len: usize) -> usize;

    /// Random identifier of `len` characters from `[a-zA-Z0-9]`.
    fn gen_id(&self, len: usize) -> String;

    fn gen_uuid(&self) -> Uuid;
}
