//! API layer - HTTP and SSE entry points.

pub mod auth;
pub mod dto;
pub mod events;
pub mod http;

pub use http::{routes, ApiError};
