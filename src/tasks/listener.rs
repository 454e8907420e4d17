//! Invalidation Listener Task
//!
//! Single consumer of remote channel events. Each event is applied under
//! the cache's write lock, so remote invalidations are serialized with
//! local mutations.

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::SharedCache;

/// Spawns the task that applies remote channel events to `cache`.
///
/// The task takes ownership of the cache's event queue; after it starts,
/// `Cache::drain_channel_events` no longer sees events. If the queue was
/// already taken the task logs a warning and exits.
///
/// # Returns
/// A JoinHandle for the spawned task, to abort it on shutdown.
pub fn spawn_invalidation_listener(cache: SharedCache) -> JoinHandle<()> {
    tokio::spawn(async move {
        let receiver = cache.write().await.take_channel_events();
        let Some(mut events) = receiver else {
            warn!("Channel event queue already taken, listener not started");
            return;
        };

        info!("Remote invalidation listener started");

        while let Some(event) = events.recv().await {
            debug!(
                "Channel event from {} (channel {})",
                event.address, event.channel_id
            );
            cache.write().await.apply_channel_event(event);
        }

        info!("Remote invalidation listener stopped");
    })
}
