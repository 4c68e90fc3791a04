//! Combat-related domain outcomes
//!
//! Returned by `Player::apply_damage` so the caller can decide which
//! events to emit.

/// Outcome of a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target took damage and has `remaining` health (possibly already 0)
    Damaged { remaining: u32 },
    /// This hit brought the target from above zero to exactly zero
    Defeated,
}

impl DamageOutcome {
    pub fn is_defeat(&self) -> bool {
        matches!(self, Self::Defeated)
    }
}
