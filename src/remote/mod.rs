//! Remote Invalidation Module
//!
//! Lets external producers evict entries by sending invalidation messages
//! over duplex channels the cache opens on demand.

mod manager;
mod message;
mod transport;
mod websocket;

#[cfg(test)]
pub(crate) mod testing;

pub use manager::{ChannelManager, ChannelState};
pub use message::{decode_selector, InvalidationMessage, SelectorKind};
pub use transport::{ChannelEvent, ChannelEventKind, ChannelEvents, ChannelHandle, Transport};
pub use websocket::WebSocketTransport;
