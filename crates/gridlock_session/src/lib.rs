//! Gridlock peer-to-peer session protocol.
//!
//! Two peers each run their own copy of the game. They keep those copies in
//! step by exchanging full board snapshots over a [`Transport`]:
//!
//! - **Roles**: whoever moves first on an empty board is X, the other O
//! - **Outbound**: local moves queue until the channel opens, then flush in
//!   order
//! - **Inbound**: snapshots replace the local board; results and chat are
//!   surfaced as [`Inbound`] directives for the controller to apply
//! - **Sync**: throttled full-board syncs keep late joiners aligned

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod code;
mod error;
mod message;
mod role;
mod session;
mod transport;

pub mod testing;

pub use code::{CODE_LENGTH, SessionCode};
pub use error::{ProtocolError, TransportError};
pub use message::Message;
pub use role::PlayerRole;
pub use session::{Claim, DEFAULT_SYNC_INTERVAL, Inbound, Rejection, Session};
pub use transport::{ChannelEvent, LinkState, Transport};
