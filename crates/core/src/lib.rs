//! Shared building blocks for the cycle and dependency engines.
//!
//! - [`time`]: calendar arithmetic, duration and time-stamp grammars
//! - [`error`]: construction-time and collaborator error types
//! - [`config`]: environment-driven engine configuration
//! - [`logging`]: `tracing` subscriber setup

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use config::EngineConfig;
pub use error::*;
