//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default maximum number of entries
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// Default entry TTL in milliseconds
pub const DEFAULT_TTL_MS: u64 = 60_000;

/// Default reaper interval in milliseconds
pub const DEFAULT_REAPER_INTERVAL_MS: u64 = 300_000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
    /// Interval between background sweeps of expired entries
    pub reaper_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 60000)
    /// - `CACHE_REAPER_INTERVAL_MS` - Sweep interval in milliseconds (default: 300000)
    pub fn from_env() -> Self {
        Self {
            max_size: env_or("CACHE_MAX_SIZE", DEFAULT_MAX_SIZE),
            default_ttl: Duration::from_millis(env_or("CACHE_DEFAULT_TTL_MS", DEFAULT_TTL_MS)),
            reaper_interval: Duration::from_millis(env_or(
                "CACHE_REAPER_INTERVAL_MS",
                DEFAULT_REAPER_INTERVAL_MS,
            )),
        }
    }

    /// Overrides the capacity.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Overrides the default TTL.
    pub fn with_default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    /// Overrides the reaper interval.
    pub fn with_reaper_interval(mut self, reaper_interval: Duration) -> Self {
        self.reaper_interval = reaper_interval;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            default_ttl: Duration::from_millis(DEFAULT_TTL_MS),
            reaper_interval: Duration::from_millis(DEFAULT_REAPER_INTERVAL_MS),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
