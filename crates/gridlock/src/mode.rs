//! Game mode selection.

use gridlock_tictactoe::Difficulty;

/// Who the opponent is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameMode {
    /// Two players taking turns on one device.
    #[default]
    Local,
    /// Against the computer at the given difficulty.
    Computer(Difficulty),
    /// Against a peer over a transport.
    Online,
}

impl GameMode {
    /// Returns display name.
    pub fn name(&self) -> String {
        match self {
            GameMode::Local => "Hot seat".to_string(),
            GameMode::Computer(difficulty) => format!("Computer ({difficulty})"),
            GameMode::Online => "Online".to_string(),
        }
    }

    /// True for peer-to-peer play.
    pub fn is_online(&self) -> bool {
        matches!(self, GameMode::Online)
    }
}
