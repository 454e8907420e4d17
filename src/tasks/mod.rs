//! Background Tasks Module
//!
//! Contains background tasks that run alongside a shared cache.
//!
//! # Tasks
//! - TTL Cleanup: Purges expired entries at configured intervals
//! - Invalidation Listener: Applies remote channel events to the cache

mod cleanup;
mod listener;

pub use cleanup::spawn_cleanup_task;
pub use listener::spawn_invalidation_listener;
