//! WebSocket Transport
//!
//! Opens remote invalidation channels as WebSocket client connections.
//! Only inbound text frames are forwarded; the outbound half is used for
//! the closing handshake alone.

use futures_util::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};
use crate::remote::transport::{ChannelEvents, ChannelHandle, Transport};

// == WebSocket Transport ==
/// Transport that connects to `ws://` / `wss://` addresses.
///
/// Requires a running tokio runtime at the time a channel is opened.
#[derive(Debug, Clone, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for WebSocketTransport {
    fn open(&self, address: &str, events: ChannelEvents) -> Result<ChannelHandle> {
        let runtime =
            Handle::try_current().map_err(|e| CacheError::TransportUnavailable(e.to_string()))?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        runtime.spawn(run_channel(address.to_string(), events, shutdown_rx));

        Ok(ChannelHandle::new(shutdown_tx))
    }
}

/// Drives one connection until it closes, fails, or is shut down locally.
async fn run_channel(
    address: String,
    events: ChannelEvents,
    mut shutdown: oneshot::Receiver<()>,
) {
    let connection = tokio::select! {
        result = connect_async(address.as_str()) => result,
        _ = &mut shutdown => {
            debug!("Channel to {} closed before connecting", address);
            events.closed();
            return;
        }
    };

    let socket = match connection {
        Ok((socket, _)) => socket,
        Err(e) => {
            warn!("Failed to connect invalidation channel {}: {}", address, e);
            events.failed(e.to_string());
            return;
        }
    };

    info!("Invalidation channel connected: {}", address);
    events.ready();

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            message = stream.next() => match message {
                Some(Ok(Message::Text(text))) => events.message(text.to_string()),
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Invalidation channel {} closed by peer", address);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Invalidation channel {} error: {}", address, e);
                    break;
                }
            },
            _ = &mut shutdown => {
                if let Err(e) = sink.send(Message::Close(None)).await {
                    debug!("Close frame to {} not delivered: {}", address, e);
                }
                break;
            }
        }
    }

    info!("Invalidation channel closed: {}", address);
    events.closed();
}
