//! Cache Entry Module
//!
//! Defines the record stored for each internal key, with TTL and dependency metadata.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::cache::Selector;

// == Set Options ==
/// Optional metadata supplied with `set`.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Lifetime in milliseconds; `None` or `Some(0)` never expires
    pub ttl_ms: Option<u64>,
    /// Keys or patterns whose invalidation also invalidates this entry
    pub depends_on: Vec<Selector>,
    /// Address of a remote invalidation source for this entry
    pub remote_channel: Option<String>,
}

impl SetOptions {
    /// Creates empty options (no TTL, no dependencies, no channel).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TTL in milliseconds.
    pub fn ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }

    /// Adds a dependency.
    pub fn depends_on(mut self, selector: impl Into<Selector>) -> Self {
        self.depends_on.push(selector.into());
        self
    }

    /// Associates a remote invalidation channel address.
    pub fn remote_channel(mut self, address: impl Into<String>) -> Self {
        self.remote_channel = Some(address.into());
        self
    }
}

// == Entry ==
/// A single cached value with its metadata.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The caller-visible key
    pub logical_key: String,
    /// The stored value
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Lifetime in milliseconds, None or 0 = no expiration
    pub ttl_ms: Option<u64>,
    /// Declared dependencies, in declaration order
    pub depends_on: Vec<Selector>,
    /// Remote invalidation channel address recorded at set-time
    pub remote_channel: Option<String>,
    /// Set once the value has been updated in place
    pub dirty: bool,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(logical_key: String, value: Value, options: SetOptions) -> Self {
        Self {
            logical_key,
            value,
            created_at: current_timestamp_ms(),
            ttl_ms: options.ttl_ms,
            depends_on: options.depends_on,
            remote_channel: options.remote_channel,
            dirty: false,
        }
    }

    // == Expires At ==
    /// Returns the expiration timestamp, or None if the entry never expires.
    pub fn expires_at(&self) -> Option<u64> {
        match self.ttl_ms {
            Some(ttl) if ttl > 0 => Some(self.created_at.saturating_add(ttl)),
            _ => None,
        }
    }

    // == Is Live ==
    /// Checks whether the entry is live at `now` (Unix milliseconds).
    ///
    /// An entry with a TTL stops being live once `now` reaches
    /// `created_at + ttl_ms`.
    pub fn is_live_at(&self, now: u64) -> bool {
        match self.expires_at() {
            Some(expires) => now < expires,
            None => true,
        }
    }

    /// Checks whether the entry is live now.
    pub fn is_live(&self) -> bool {
        self.is_live_at(current_timestamp_ms())
    }

    // == Update ==
    /// Replaces the value in place and marks the entry dirty.
    ///
    /// TTL window and dependencies are left untouched.
    pub fn update(&mut self, value: Value) {
        self.value = value;
        self.dirty = true;
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at()
            .map(|expires| expires.saturating_sub(current_timestamp_ms()))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
