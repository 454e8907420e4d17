//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::Diagnostics;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for operations on a single key (PUT /set, PUT /update)
#[derive(Debug, Clone, Serialize)]
pub struct KeyResponse {
    /// Success message
    pub message: String,
    /// The key that was written
    pub key: String,
}

impl KeyResponse {
    /// Creates a response for a stored key
    pub fn set(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }

    /// Creates a response for an updated key
    pub fn updated(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' updated successfully", key),
            key,
        }
    }
}

/// Response body for removals (DELETE /del/:key, POST /invalidate)
#[derive(Debug, Clone, Serialize)]
pub struct RemoveResponse {
    /// Summary message
    pub message: String,
    /// The selector that was applied
    pub selector: String,
    /// Number of entries removed, dependents included
    pub removed: usize,
}

impl RemoveResponse {
    /// Creates a new RemoveResponse
    pub fn new(selector: impl Into<String>, removed: usize) -> Self {
        let selector = selector.into();
        Self {
            message: format!("Removed {} entries for '{}'", removed, selector),
            selector,
            removed,
        }
    }
}

/// Response body for the clear endpoint (POST /clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn new() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

impl Default for ClearResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Entries removed by explicit or remote invalidation
    pub removals: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Remote invalidation channels currently open
    pub open_channels: usize,
    /// Human-readable memory estimate
    pub approximate_size: String,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache diagnostics
    pub fn new(diagnostics: &Diagnostics, open_channels: usize) -> Self {
        Self {
            hits: diagnostics.hits,
            misses: diagnostics.misses,
            hit_rate: diagnostics.hit_rate(),
            removals: diagnostics.removals,
            expirations: diagnostics.expirations,
            total_entries: diagnostics.total_entries,
            open_channels,
            approximate_size: diagnostics.approximate_size.clone(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
