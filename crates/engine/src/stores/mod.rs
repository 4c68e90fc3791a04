//! In-memory state storage modules.
//!
//! Stores manage process-wide runtime state:
//! - `GameRegistry` - live worlds by ID
//! - `SessionStore` - bearer tokens bound to a world and player

pub mod games;
pub mod session;

pub use games::GameRegistry;
pub use session::{SessionClaims, SessionError, SessionStore};
