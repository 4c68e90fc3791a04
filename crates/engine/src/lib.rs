//! Wayfarer Engine library.
//!
//! Server side of a multiplayer text adventure: the in-memory world, the
//! location-scoped event fan-out, and the HTTP/SSE transport over it.
//!
//! ## Structure
//!
//! - `entities/` - World state store, subscription registry, broadcaster, world aggregate
//! - `stores/` - Process-wide game registry and session tokens
//! - `use_cases/` - User story orchestration across entities
//! - `infrastructure/` - Ports, their system implementations, configuration
//! - `api/` - HTTP and SSE entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
