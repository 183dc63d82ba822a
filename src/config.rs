//! Configuration Module
//!
//! Loads server, cache and rate limiting settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TTL_SECS};
use crate::ratelimit::{
    DEFAULT_INTERVAL_SECS, DEFAULT_LENIENT_LIMIT, DEFAULT_MAX_TRACKED_TOKENS, DEFAULT_STRICT_LIMIT,
};

/// Shortest accepted sweep or rate-limit interval, in seconds
pub const MIN_INTERVAL_SECS: u64 = 1;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for cache entries stored without one
    pub cache_default_ttl: u64,
    /// Seconds between background sweeps of expired entries
    pub cache_sweep_interval: u64,
    /// Rate limit window length in seconds
    pub rate_limit_interval: u64,
    /// Client tokens tracked per limiter before LRU eviction
    pub rate_limit_max_tokens: usize,
    /// Requests per window through the strict gate
    pub strict_limit: u32,
    /// Requests per window through the lenient gate
    pub lenient_limit: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DEFAULT_TTL` - Default entry TTL in seconds (default: 60)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `RATE_LIMIT_INTERVAL` - Window length in seconds (default: 60)
    /// - `RATE_LIMIT_MAX_TOKENS` - Tracked clients per limiter (default: 500)
    /// - `STRICT_LIMIT` - Strict gate requests per window (default: 3)
    /// - `LENIENT_LIMIT` - Lenient gate requests per window (default: 60)
    ///
    /// Missing or unparseable values fall back to the default. Intervals
    /// below one second are raised to one second.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_default_ttl: env_or("CACHE_DEFAULT_TTL", defaults.cache_default_ttl),
            cache_sweep_interval: env_or("CACHE_SWEEP_INTERVAL", defaults.cache_sweep_interval)
                .max(MIN_INTERVAL_SECS),
            rate_limit_interval: env_or("RATE_LIMIT_INTERVAL", defaults.rate_limit_interval)
                .max(MIN_INTERVAL_SECS),
            rate_limit_max_tokens: env_or("RATE_LIMIT_MAX_TOKENS", defaults.rate_limit_max_tokens),
            strict_limit: env_or("STRICT_LIMIT", defaults.strict_limit),
            lenient_limit: env_or("LENIENT_LIMIT", defaults.lenient_limit),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_default_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval)
    }

    pub fn limiter_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_default_ttl: DEFAULT_TTL_SECS,
            cache_sweep_interval: DEFAULT_SWEEP_INTERVAL_SECS,
            rate_limit_interval: DEFAULT_INTERVAL_SECS,
            rate_limit_max_tokens: DEFAULT_MAX_TRACKED_TOKENS,
            strict_limit: DEFAULT_STRICT_LIMIT,
            lenient_limit: DEFAULT_LENIENT_LIMIT,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
