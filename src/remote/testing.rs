//! In-memory transports for unit tests.

use std::sync::Mutex;

use crate::error::{CacheError, Result};
use crate::remote::transport::{ChannelEvents, ChannelHandle, Transport};

/// Records every open request; tests drive the channel through its events.
#[derive(Default)]
pub struct RecordingTransport {
    opened: Mutex<Vec<ChannelEvents>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_count(&self, address: &str) -> usize {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .filter(|events| events.address() == address)
            .count()
    }

    /// Event sender of the most recent channel opened for `address`.
    pub fn events(&self, address: &str) -> ChannelEvents {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|events| events.address() == address)
            .cloned()
            .expect("no channel opened for address")
    }
}

impl Transport for RecordingTransport {
    fn open(&self, _address: &str, events: ChannelEvents) -> Result<ChannelHandle> {
        self.opened.lock().unwrap().push(events);
        Ok(ChannelHandle::detached())
    }
}

/// Refuses every open request.
pub struct FailingTransport;

impl Transport for FailingTransport {
    fn open(&self, address: &str, _events: ChannelEvents) -> Result<ChannelHandle> {
        Err(CacheError::TransportUnavailable(format!(
            "refusing to open {}",
            address
        )))
    }
}
