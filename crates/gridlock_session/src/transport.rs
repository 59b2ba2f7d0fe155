//! The seam to whatever actually carries messages between peers.

use crate::error::TransportError;
use crate::message::Message;

/// An outbound message channel to the peer.
///
/// Implementations deliver what they are given; they need not preserve
/// order across reconnects, since every board message is a full snapshot.
pub trait Transport: Send {
    /// Whether `send` can currently deliver.
    fn is_open(&self) -> bool;

    /// Hands one message to the channel.
    fn send(&mut self, message: &Message) -> Result<(), TransportError>;

    /// Tears the channel down. Further sends fail.
    fn close(&mut self);
}

/// Something that happened on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The channel is ready for traffic.
    Open,
    /// The peer went away.
    Close,
    /// Setup or delivery failed; the text is for display.
    Error(String),
    /// Raw text of one inbound message.
    Data(String),
}

/// Link lifecycle as seen by the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkState {
    /// Not connected yet; connecting may be retried.
    #[default]
    Idle,
    /// Traffic flows.
    Open,
    /// The peer disconnected. The match is over.
    Closed,
}
