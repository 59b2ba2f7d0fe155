//! Wire messages exchanged between peers.
//!
//! Every board-carrying message holds a full snapshot rather than a delta,
//! so the receiver can simply replace its board no matter what it missed.

use crate::error::ProtocolError;
use gridlock_tictactoe::Board;
use serde::{Deserialize, Serialize};
use tracing::instrument;

const KNOWN_TYPES: [&str; 5] = ["move", "sync", "clear", "gameOver", "chat"];

/// A message on the peer channel, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    /// Board after the sender's move.
    Move {
        /// Full board snapshot.
        board: Board,
    },
    /// Board the receiver should adopt as-is.
    Sync {
        /// Full board snapshot.
        board: Board,
    },
    /// Start a fresh match from this board (normally empty).
    Clear {
        /// Full board snapshot.
        board: Board,
    },
    /// The match ended; `message` is the result banner.
    GameOver {
        /// Result text.
        message: String,
    },
    /// A chat line, already prefixed with the sender's role.
    Chat {
        /// Chat text.
        message: String,
    },
}

impl Message {
    /// Wire name of this message's type.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Move { .. } => "move",
            Message::Sync { .. } => "sync",
            Message::Clear { .. } => "clear",
            Message::GameOver { .. } => "gameOver",
            Message::Chat { .. } => "chat",
        }
    }

    /// A clear carrying an empty board.
    pub fn clear() -> Self {
        Message::Clear {
            board: Board::new(),
        }
    }

    /// Serializes to a single line of JSON.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// Parses one message, telling unknown types apart from garbage.
    #[instrument(skip(raw), fields(len = raw.len()))]
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ProtocolError::Malformed("missing \"type\"".to_string()))?;

        if !KNOWN_TYPES.contains(&kind) {
            return Err(ProtocolError::UnknownType(kind.to_string()));
        }

        serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}
