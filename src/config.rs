//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in milliseconds applied by the HTTP layer, 0 = never expires
    pub default_ttl_ms: u64,
    /// Whether TTL expiry also removes dependent entries
    pub cascade_on_expiry: bool,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
}

/// Settings that change the behaviour of a single cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// When true, entries dropped for expiry cascade to their dependents
    pub cascade_on_expiry: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 0, never expires)
    /// - `CASCADE_ON_EXPIRY` - Cascade expiry to dependents (default: false)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_ms: env_or("DEFAULT_TTL_MS", defaults.default_ttl_ms),
            cascade_on_expiry: env_or("CASCADE_ON_EXPIRY", defaults.cascade_on_expiry),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Returns the per-instance cache settings.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            cascade_on_expiry: self.cascade_on_expiry,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_ms: 0,
            cascade_on_expiry: false,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
