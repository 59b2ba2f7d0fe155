//! In-memory transport for tests and local wiring.
//!
//! Clones share one wire, so a test can hand a clone to the code under test
//! and keep another to open, close or inspect the channel.

use crate::error::TransportError;
use crate::message::Message;
use crate::transport::Transport;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
struct Wire {
    open: bool,
    fail_sends: bool,
    outbox: Vec<String>,
    history: Vec<Message>,
}

/// Records every message sent; never delivers anything by itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    wire: Arc<Mutex<Wire>>,
}

impl MemoryTransport {
    /// A closed channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel that is already open.
    pub fn open() -> Self {
        let transport = Self::new();
        transport.set_open(true);
        transport
    }

    fn wire(&self) -> MutexGuard<'_, Wire> {
        self.wire.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens or closes the channel.
    pub fn set_open(&self, open: bool) {
        self.wire().open = open;
    }

    /// Makes every send fail until switched back.
    pub fn fail_sends(&self, fail: bool) {
        self.wire().fail_sends = fail;
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<Message> {
        self.wire().history.clone()
    }

    /// Encoded messages sent since the last drain, ready to feed to the
    /// other peer as inbound data.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut self.wire().outbox)
    }
}

impl Transport for MemoryTransport {
    fn is_open(&self) -> bool {
        self.wire().open
    }

    fn send(&mut self, message: &Message) -> Result<(), TransportError> {
        let mut wire = self.wire();
        if !wire.open {
            return Err(TransportError::new("channel is not open"));
        }
        if wire.fail_sends {
            return Err(TransportError::new("send refused"));
        }
        let raw = message
            .encode()
            .map_err(|e| TransportError::new(e.to_string()))?;
        debug!(kind = message.kind(), "Memory transport send");
        wire.outbox.push(raw);
        wire.history.push(message.clone());
        Ok(())
    }

    fn close(&mut self) {
        self.wire().open = false;
    }
}
