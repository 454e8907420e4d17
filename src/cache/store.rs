//! Cache Store Module
//!
//! Main cache engine: entry storage keyed by derived keys, lazy TTL expiry,
//! dependency-aware removal and remote invalidation channels.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cache::entry::current_timestamp_ms;
use crate::cache::resolver::{resolve, resolve_from};
use crate::cache::{derive_key, Entry, Selector, SetOptions};
use crate::config::CacheConfig;
use crate::diagnostics::Diagnostics;
use crate::remote::{ChannelEvent, ChannelManager, ChannelState, Transport};

// == Cache ==
/// An in-process key/value cache.
///
/// All mutations take `&mut self`; share an instance across tasks behind
/// [`SharedCache`](crate::cache::SharedCache).
#[derive(Debug)]
pub struct Cache {
    /// Entries keyed by internal key
    entries: HashMap<String, Entry>,
    /// Remote invalidation channels
    channels: ChannelManager,
    /// Footprint and counters
    diagnostics: Diagnostics,
    config: CacheConfig,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    // == Constructors ==
    /// Creates a cache with default settings and no remote transport.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with the given settings and no remote transport.
    ///
    /// Remote channel addresses passed to `set` are recorded but never opened.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::build(config, None)
    }

    /// Creates a cache that opens remote channels through `transport`.
    ///
    /// Channel events queue until consumed. Call `drain_channel_events`
    /// regularly or hand the queue to `spawn_invalidation_listener`;
    /// otherwise the queue grows without bound and channels never leave
    /// `Opening`.
    pub fn with_transport(config: CacheConfig, transport: Arc<dyn Transport>) -> Self {
        Self::build(config, Some(transport))
    }

    fn build(config: CacheConfig, transport: Option<Arc<dyn Transport>>) -> Self {
        Self {
            entries: HashMap::new(),
            channels: ChannelManager::new(transport),
            diagnostics: Diagnostics::new(),
            config,
        }
    }

    // == Get ==
    /// Retrieves a value by logical key.
    ///
    /// Returns None if the key is missing or expired; an expired entry is
    /// removed before returning.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let internal_key = derive_key(key);

        match self.entries.get(&internal_key).map(Entry::is_live) {
            Some(true) => {
                self.diagnostics.record_hit();
                self.entries.get(&internal_key).map(|entry| entry.value.clone())
            }
            Some(false) => {
                debug!("Key '{}' expired on read", key);
                self.expire(vec![internal_key]);
                self.diagnostics.record_miss();
                None
            }
            None => {
                self.diagnostics.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a value, replacing any existing entry for the key.
    ///
    /// A remote channel address in `options` is opened if it is not already
    /// Opening or Open.
    pub fn set(&mut self, key: impl Into<String>, value: Value, options: SetOptions) {
        let key = key.into();
        let internal_key = derive_key(&key);

        if let Some(address) = &options.remote_channel {
            self.channels.ensure_open(address);
        }

        debug!("Set key '{}' as {}", key, internal_key);
        self.entries
            .insert(internal_key, Entry::new(key, value, options));
        self.diagnostics.recompute(&self.entries);
    }

    // == Update ==
    /// Replaces the value of a live entry and marks it dirty.
    ///
    /// The TTL window and dependencies stay as they were at `set` time.
    /// Returns false, changing nothing, if no live entry exists.
    pub fn update(&mut self, key: &str, value: Value) -> bool {
        let internal_key = derive_key(key);

        match self.entries.get(&internal_key).map(Entry::is_live) {
            Some(true) => {}
            Some(false) => {
                debug!("Key '{}' expired before update", key);
                self.expire(vec![internal_key]);
                return false;
            }
            None => return false,
        }

        if let Some(entry) = self.entries.get_mut(&internal_key) {
            entry.update(value);
        }
        self.diagnostics.recompute(&self.entries);
        true
    }

    // == Remove ==
    /// Removes the selected entries and everything that depends on them.
    ///
    /// Returns the number of entries removed. Selecting nothing is not an error.
    pub fn remove(&mut self, selector: &Selector) -> usize {
        let keys = resolve(&self.entries, selector);
        let removed = self.delete_all(keys);
        self.diagnostics.record_removals(removed);

        debug!("Removed {} entries for {}", removed, selector);
        removed
    }

    // == Clear ==
    /// Removes every entry and resets diagnostics. Channels stay open.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.diagnostics.reset();
        info!("Cache cleared ({} entries)", count);
    }

    // == Purge Expired ==
    /// Removes every entry whose TTL has elapsed.
    ///
    /// Returns the number of entries removed, including dependents when
    /// expiry cascades.
    pub fn purge_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_live_at(now))
            .map(|(internal_key, _)| internal_key.clone())
            .collect();

        if expired.is_empty() {
            return 0;
        }
        self.expire(expired)
    }

    // == Diagnostics ==
    /// Human-readable estimate of the memory held by entries.
    pub fn approximate_size(&self) -> &str {
        &self.diagnostics.approximate_size
    }

    /// Returns a snapshot of the cache diagnostics.
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics.clone()
    }

    // == Inspection ==
    /// Returns the stored entry for a key without checking liveness.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(&derive_key(key))
    }

    /// Returns the number of stored entries, live or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Remote Channels ==
    /// Returns the state of the remote channel for `address`.
    pub fn channel_state(&self, address: &str) -> ChannelState {
        self.channels.state(address)
    }

    /// Number of remote channels currently Open.
    pub fn open_channels(&self) -> usize {
        self.channels.open_count()
    }

    /// Closes the remote channel for `address`, if any.
    pub fn close_channel(&mut self, address: &str) -> bool {
        self.channels.close(address)
    }

    /// Closes every remote channel.
    pub fn close_channels(&mut self) {
        self.channels.close_all();
    }

    /// Applies one channel event, removing entries for invalidation messages.
    pub fn apply_channel_event(&mut self, event: ChannelEvent) {
        if let Some(selector) = self.channels.handle_event(event) {
            self.remove(&selector);
        }
    }

    /// Applies every queued channel event and returns how many were applied.
    ///
    /// Returns 0 once the queue has been handed out by `take_channel_events`.
    pub fn drain_channel_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.channels.try_next_event() {
            self.apply_channel_event(event);
            applied += 1;
        }
        applied
    }

    /// Hands the channel event queue to an external consumer.
    pub fn take_channel_events(&mut self) -> Option<mpsc::UnboundedReceiver<ChannelEvent>> {
        self.channels.take_events()
    }

    // == Internal Helpers ==
    /// Drops expired entries, cascading to dependents when configured.
    fn expire(&mut self, expired: Vec<String>) -> usize {
        let keys: HashSet<String> = if self.config.cascade_on_expiry {
            resolve_from(&self.entries, expired)
        } else {
            expired.into_iter().collect()
        };

        let removed = self.delete_all(keys);
        self.diagnostics.record_expirations(removed);
        removed
    }

    fn delete_all(&mut self, keys: impl IntoIterator<Item = String>) -> usize {
        let removed = keys
            .into_iter()
            .filter(|internal_key| self.entries.remove(internal_key).is_some())
            .count();
        self.diagnostics.recompute(&self.entries);
        removed
    }
}
