//! The mark a networked participant is bound to.

use gridlock_tictactoe::Mark;
use serde::{Deserialize, Serialize};

/// Role for the current match; assigned on first contact, cleared on every
/// restart or clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    /// No move attempted yet this match.
    #[default]
    Unassigned,
    /// Moved first.
    X,
    /// Arrived second.
    O,
}

impl PlayerRole {
    /// The bound mark, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            PlayerRole::Unassigned => None,
            PlayerRole::X => Some(Mark::X),
            PlayerRole::O => Some(Mark::O),
        }
    }

    /// Short label used to prefix chat lines.
    pub fn label(self) -> &'static str {
        match self {
            PlayerRole::Unassigned => "?",
            PlayerRole::X => "X",
            PlayerRole::O => "O",
        }
    }
}

impl From<Mark> for PlayerRole {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => PlayerRole::X,
            Mark::O => PlayerRole::O,
        }
    }
}
