//! Everything the match controller reacts to.

use crate::mode::GameMode;
use gridlock_session::ChannelEvent;
use gridlock_tictactoe::Difficulty;

/// One input to the dispatch loop. Each is handled to completion before the
/// next is looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The local player picked a cell (0-8).
    CellSelected(usize),
    /// Start over, dropping queued messages and chat.
    Restart,
    /// Wipe the board and tell the peer to do the same.
    Clear,
    /// Pause or resume.
    TogglePause,
    /// Switch mode; always restarts.
    SelectMode(GameMode),
    /// Change computer difficulty; restarts in computer mode.
    SelectDifficulty(Difficulty),
    /// Send a chat line to the peer.
    SendChat(String),
    /// Something happened on the peer channel.
    Channel(ChannelEvent),
    /// Leave the dispatch loop.
    Quit,
}
