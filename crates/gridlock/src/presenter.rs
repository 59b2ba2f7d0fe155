//! The seam to whatever shows the match to a human.

use derive_more::{Display, Error};
use gridlock_tictactoe::Board;

/// Sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A mark was placed or a button pressed.
    Click,
    /// A match ended.
    Win,
}

/// Receives everything the controller wants displayed.
///
/// The result overlay is expected to dismiss itself; the controller never
/// asks for it to be hidden.
pub trait Presenter {
    /// Redraw all nine cells.
    fn render_board(&mut self, board: &Board);

    /// Main status line (whose turn, paused, ...).
    fn set_status(&mut self, text: &str);

    /// Connection status line.
    fn set_link_status(&mut self, text: &str);

    /// Result banner.
    fn show_result(&mut self, text: &str);

    /// One chat line.
    fn append_chat(&mut self, line: &str);

    /// Play a sound. Failures are logged by the caller and otherwise ignored.
    fn play(&mut self, cue: Cue) -> Result<(), PresentError>;
}

/// Presentation error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Presentation error: {} at {}:{}", message, file, line)]
pub struct PresentError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PresentError {
    /// Creates a new presentation error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
