//! Tracing subscriber setup for hosts embedding the engines.

use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;

/// Install a fmt subscriber. `RUST_LOG` wins over the configured verbosity.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(config: &EngineConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
