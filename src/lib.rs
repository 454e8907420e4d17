//! imcache - An in-process key/value cache
//!
//! Provides TTL expiration, dependency-aware invalidation and remote
//! invalidation channels, with an optional HTTP front end.

pub mod api;
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod remote;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, Selector, SetOptions, SharedCache};
pub use config::{CacheConfig, Config};
pub use error::{CacheError, Result};
pub use tasks::{spawn_cleanup_task, spawn_invalidation_listener};
