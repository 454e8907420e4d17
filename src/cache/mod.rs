//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and dependency-aware invalidation.

mod entry;
mod key;
mod resolver;
mod selector;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::{current_timestamp_ms, Entry, SetOptions};
pub use key::{derive_key, hash32, INTERNAL_KEY_PREFIX};
pub use resolver::{direct_matches, resolve, resolve_from};
pub use selector::Selector;
pub use store::Cache;

/// A cache shared between request handlers and background tasks.
pub type SharedCache = Arc<RwLock<Cache>>;

/// Wraps a cache for sharing.
pub fn shared(cache: Cache) -> SharedCache {
    Arc::new(RwLock::new(cache))
}
