use std::env;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::time::{format_duration, parse_duration};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_parsed<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    match profiled_env_opt(profile, key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable config value, using default");
            default
        }),
        None => default,
    }
}

fn profiled_env_duration(profile: &str, key: &str, default: Duration) -> Duration {
    match profiled_env_opt(profile, key) {
        Some(raw) => parse_duration(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "invalid duration in config, using default");
            default
        }),
        None => default,
    }
}

/// Default minimum age of a data dependency's file (five minutes).
pub const DEFAULT_DATA_AGE_SECS: i64 = 300;

// ── Engine config ─────────────────────────────────────────────

/// Tunables for the cycle and dependency engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Diagnostic verbosity: 0 = warnings only, 10+ = full trace.
    pub verbose: u8,
    /// Minimum age a file must reach before a data dependency resolves.
    #[serde(with = "crate::time::serde_duration")]
    pub data_age: Duration,
    /// Minimum size in bytes a file must reach before a data dependency resolves.
    pub data_min_size: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: String::new(),
            verbose: 0,
            data_age: Duration::seconds(DEFAULT_DATA_AGE_SECS),
            data_min_size: 0,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `WFM_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("WFM_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        let defaults = Self::default();
        Self {
            profile: p.to_string(),
            verbose: profiled_env_parsed(p, "WFM_VERBOSE", defaults.verbose),
            data_age: profiled_env_duration(p, "WFM_DATA_AGE", defaults.data_age),
            data_min_size: profiled_env_parsed(p, "WFM_DATA_MIN_SIZE", defaults.data_min_size),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// `tracing` filter directive matching the configured verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2..=9 => "debug",
            _ => "trace",
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Engine config loaded (profile: {}):", self.profile_label());
        tracing::info!("  verbose:       {}", self.verbose);
        tracing::info!("  data_age:      {}", format_duration(self.data_age));
        tracing::info!("  data_min_size: {}", self.data_min_size);
    }
}
