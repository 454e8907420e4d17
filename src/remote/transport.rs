//! Transport Module
//!
//! The seam between the channel manager and a concrete duplex transport.
//! A transport opens one channel per call and reports what happens to it
//! through [`ChannelEvents`]; it never touches the cache directly.

use tokio::sync::{mpsc, oneshot};

use crate::error::Result;

// == Channel Event ==
/// Something that happened on a remote channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    /// Address the channel was opened for
    pub address: String,
    /// Identifies one opening of `address`
    pub channel_id: u64,
    pub kind: ChannelEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEventKind {
    /// Connection established
    Ready,
    /// Inbound text message
    Message(String),
    /// Connection could not be established
    Failed(String),
    /// Connection ended, locally or remotely
    Closed,
}

// == Channel Events ==
/// Reporting side handed to a transport when a channel is opened.
///
/// Events are queued for a single consumer. Sending never blocks and is
/// silently dropped once the owning cache is gone.
#[derive(Debug, Clone)]
pub struct ChannelEvents {
    address: String,
    channel_id: u64,
    tx: mpsc::UnboundedSender<ChannelEvent>,
}

impl ChannelEvents {
    pub fn new(
        address: impl Into<String>,
        channel_id: u64,
        tx: mpsc::UnboundedSender<ChannelEvent>,
    ) -> Self {
        Self {
            address: address.into(),
            channel_id,
            tx,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn ready(&self) {
        self.emit(ChannelEventKind::Ready);
    }

    pub fn message(&self, text: impl Into<String>) {
        self.emit(ChannelEventKind::Message(text.into()));
    }

    pub fn failed(&self, reason: impl Into<String>) {
        self.emit(ChannelEventKind::Failed(reason.into()));
    }

    pub fn closed(&self) {
        self.emit(ChannelEventKind::Closed);
    }

    fn emit(&self, kind: ChannelEventKind) {
        let _ = self.tx.send(ChannelEvent {
            address: self.address.clone(),
            channel_id: self.channel_id,
            kind,
        });
    }
}

// == Channel Handle ==
/// Owner-side handle used to close a channel locally.
#[derive(Debug, Default)]
pub struct ChannelHandle {
    shutdown: Option<oneshot::Sender<()>>,
}

impl ChannelHandle {
    /// Creates a handle that signals `shutdown` on close.
    pub fn new(shutdown: oneshot::Sender<()>) -> Self {
        Self {
            shutdown: Some(shutdown),
        }
    }

    /// Creates a handle for a channel that cannot be closed from this side.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Asks the channel to shut down. The transport reports `Closed` once it has.
    pub fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

// == Transport ==
/// Opens remote invalidation channels.
pub trait Transport: Send + Sync {
    /// Starts opening a channel to `address`.
    ///
    /// Returns an error only if the attempt cannot even be started; failures
    /// discovered later are reported through `events`.
    fn open(&self, address: &str, events: ChannelEvents) -> Result<ChannelHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_tagged() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let events = ChannelEvents::new("ws://a", 7, tx);

        events.ready();
        events.message("hello");
        events.closed();

        let first = rx.try_recv().unwrap();
        assert_eq!(first.address, "ws://a");
        assert_eq!(first.channel_id, 7);
        assert_eq!(first.kind, ChannelEventKind::Ready);
        assert_eq!(
            rx.try_recv().unwrap().kind,
            ChannelEventKind::Message("hello".to_string())
        );
        assert_eq!(rx.try_recv().unwrap().kind, ChannelEventKind::Closed);
    }

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ChannelEvents::new("ws://a", 1, tx).failed("gone");
    }

    #[test]
    fn test_handle_close_signals_shutdown() {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        ChannelHandle::new(shutdown_tx).close();
        assert!(shutdown_rx.try_recv().is_ok());

        ChannelHandle::detached().close();
    }
}
