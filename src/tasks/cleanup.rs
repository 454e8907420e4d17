//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries, so
//! entries nobody reads again do not linger until the next `get`.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that periodically purges expired entries.
///
/// The task sleeps for `cleanup_interval_secs` between runs and takes the
/// write lock only for the purge itself.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = imcache::cache::shared(Cache::new());
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: SharedCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.purge_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
