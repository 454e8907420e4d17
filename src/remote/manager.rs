//! Channel Manager Module
//!
//! Keeps at most one remote invalidation channel per address and turns
//! channel events into removal selectors.
//!
//! Per-address lifecycle:
//! - Closed -> Opening when an open is requested
//! - Opening -> Open on ready, Opening -> Closed on failure
//! - Open -> Open on message (decoded into a selector)
//! - Open -> Closed on close; the address is forgotten

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cache::Selector;
use crate::remote::message::decode_selector;
use crate::remote::transport::{
    ChannelEvent, ChannelEventKind, ChannelEvents, ChannelHandle, Transport,
};

// == Channel State ==
/// Lifecycle state of the channel for one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Closed,
    Opening,
    Open,
}

struct Channel {
    id: u64,
    state: ChannelState,
    handle: ChannelHandle,
}

// == Channel Manager ==
/// Table of live channels plus the queue their events arrive on.
pub struct ChannelManager {
    transport: Option<Arc<dyn Transport>>,
    channels: HashMap<String, Channel>,
    next_id: u64,
    events_tx: mpsc::UnboundedSender<ChannelEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<ChannelEvent>>,
}

impl ChannelManager {
    // == Constructor ==
    /// Creates a manager. Without a transport, open requests are ignored.
    pub fn new(transport: Option<Arc<dyn Transport>>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            channels: HashMap::new(),
            next_id: 0,
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    // == Ensure Open ==
    /// Starts opening a channel to `address` unless one is Opening or Open.
    ///
    /// Failures are logged and leave the address Closed.
    pub fn ensure_open(&mut self, address: &str) {
        if self.channels.contains_key(address) {
            debug!("Channel to {} already requested", address);
            return;
        }
        let Some(transport) = &self.transport else {
            debug!("No transport configured, not opening channel to {}", address);
            return;
        };

        self.next_id += 1;
        let id = self.next_id;
        let events = ChannelEvents::new(address, id, self.events_tx.clone());

        match transport.open(address, events) {
            Ok(handle) => {
                debug!("Opening channel {} to {}", id, address);
                self.channels.insert(
                    address.to_string(),
                    Channel {
                        id,
                        state: ChannelState::Opening,
                        handle,
                    },
                );
            }
            Err(e) => warn!("Could not open channel to {}: {}", address, e),
        }
    }

    // == Handle Event ==
    /// Applies a transport event to the channel table.
    ///
    /// Returns the selector to remove when the event is a well-formed
    /// invalidation message on an Open channel. Events from superseded
    /// channels are ignored.
    pub fn handle_event(&mut self, event: ChannelEvent) -> Option<Selector> {
        let current = match self.channels.get_mut(&event.address) {
            Some(channel) if channel.id == event.channel_id => channel,
            _ => {
                debug!(
                    "Ignoring event from stale channel {} to {}",
                    event.channel_id, event.address
                );
                return None;
            }
        };

        match event.kind {
            ChannelEventKind::Ready => {
                if current.state == ChannelState::Opening {
                    current.state = ChannelState::Open;
                    info!("Channel to {} is open", event.address);
                }
                None
            }
            ChannelEventKind::Message(text) => {
                if current.state != ChannelState::Open {
                    debug!("Dropping message on channel to {} before ready", event.address);
                    return None;
                }
                match decode_selector(&text) {
                    Ok(selector) => {
                        debug!("Remote invalidation from {}: {}", event.address, selector);
                        Some(selector)
                    }
                    Err(e) => {
                        warn!("Dropping message from {}: {}", event.address, e);
                        None
                    }
                }
            }
            ChannelEventKind::Failed(reason) => {
                self.channels.remove(&event.address);
                warn!("Channel to {} failed: {}", event.address, reason);
                None
            }
            ChannelEventKind::Closed => {
                self.channels.remove(&event.address);
                info!("Channel to {} closed", event.address);
                None
            }
        }
    }

    // == Close ==
    /// Closes the channel to `address` locally and forgets it.
    ///
    /// Returns false if no channel was tracked for the address.
    pub fn close(&mut self, address: &str) -> bool {
        match self.channels.remove(address) {
            Some(channel) => {
                channel.handle.close();
                info!("Closing channel to {}", address);
                true
            }
            None => false,
        }
    }

    /// Closes every tracked channel.
    pub fn close_all(&mut self) {
        for (address, channel) in self.channels.drain() {
            debug!("Closing channel to {}", address);
            channel.handle.close();
        }
    }

    // == Queries ==
    /// Returns the state of the channel for `address`.
    pub fn state(&self, address: &str) -> ChannelState {
        self.channels
            .get(address)
            .map_or(ChannelState::Closed, |channel| channel.state)
    }

    /// Number of channels in the Open state.
    pub fn open_count(&self) -> usize {
        self.channels
            .values()
            .filter(|channel| channel.state == ChannelState::Open)
            .count()
    }

    // == Event Queue ==
    /// Pops the next queued event without waiting.
    ///
    /// Always None once the receiver has been taken.
    pub fn try_next_event(&mut self) -> Option<ChannelEvent> {
        self.events_rx.as_mut()?.try_recv().ok()
    }

    /// Hands the event queue to an external consumer. Only the first call
    /// returns the receiver.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<ChannelEvent>> {
        self.events_rx.take()
    }
}

impl fmt::Debug for ChannelManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: HashMap<&str, ChannelState> = self
            .channels
            .iter()
            .map(|(address, channel)| (address.as_str(), channel.state))
            .collect();
        f.debug_struct("ChannelManager")
            .field("has_transport", &self.transport.is_some())
            .field("channels", &states)
            .finish()
    }
}
