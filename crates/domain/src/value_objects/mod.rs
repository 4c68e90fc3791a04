//! Value objects - validated, immutable domain values

mod names;

pub use names::{LocationName, PlayerName};
