//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::{Selector, SetOptions};
use crate::error::Result;

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    /// Logical keys this entry depends on
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Pattern sources this entry depends on
    #[serde(default)]
    pub depends_on_patterns: Vec<String>,
    /// Remote invalidation channel address
    #[serde(default)]
    pub remote_channel: Option<String>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// The empty key is refused here even though `Cache::set` accepts it;
    /// `GET /get/:key` and `DELETE /del/:key` cannot address it.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if matches!(&self.remote_channel, Some(address) if address.is_empty()) {
            return Some("Remote channel address cannot be empty".to_string());
        }
        None
    }

    /// Builds the cache options, applying `default_ttl_ms` when no TTL was given.
    ///
    /// Fails if a dependency pattern does not compile.
    pub fn to_options(&self, default_ttl_ms: u64) -> Result<SetOptions> {
        let mut depends_on: Vec<Selector> = self
            .depends_on
            .iter()
            .map(|key| Selector::plain(key.clone()))
            .collect();
        for source in &self.depends_on_patterns {
            depends_on.push(Selector::pattern(source)?);
        }

        Ok(SetOptions {
            ttl_ms: self.ttl_ms.or(Some(default_ttl_ms)),
            depends_on,
            remote_channel: self.remote_channel.clone(),
        })
    }
}

/// Request body for the UPDATE operation (PUT /update)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    /// The cache key
    pub key: String,
    /// The replacement value
    pub value: Value,
}
