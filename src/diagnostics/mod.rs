//! Diagnostics Module
//!
//! Tracks the approximate memory footprint of a cache and its access counters.

pub mod size;

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::Entry;

// == Diagnostics ==
/// Footprint and counters for one cache instance.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// Estimated size of all entries in bytes
    pub approximate_bytes: u64,
    /// `approximate_bytes` in human-readable form
    pub approximate_size: String,
    /// Number of successful reads
    pub hits: u64,
    /// Number of reads on missing or expired keys
    pub misses: u64,
    /// Number of entries deleted by `remove` (including dependents)
    pub removals: u64,
    /// Number of entries dropped because their TTL elapsed
    pub expirations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            approximate_bytes: 0,
            approximate_size: size::format_bytes(0),
            hits: 0,
            misses: 0,
            removals: 0,
            expirations: 0,
            total_entries: 0,
        }
    }
}

impl Diagnostics {
    // == Constructor ==
    /// Creates diagnostics in the empty state.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_removals(&mut self, count: usize) {
        self.removals += count as u64;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Recompute ==
    /// Recomputes the footprint and entry count from the current entry map.
    pub fn recompute(&mut self, entries: &HashMap<String, Entry>) {
        self.approximate_bytes = size::estimate_bytes(entries);
        self.approximate_size = size::format_bytes(self.approximate_bytes);
        self.total_entries = entries.len();
    }

    // == Reset ==
    /// Returns every figure to the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
