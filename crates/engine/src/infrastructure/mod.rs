//! Infrastructure: ports, their system implementations and configuration.

pub mod clock;
pub mod ports;
pub mod settings;
