//! Shared test helpers.

#![allow(dead_code)]

use gridlock::{Cue, MatchConfig, MatchController, PresentError, Presenter};
use gridlock_tictactoe::Board;

/// Presenter that remembers everything it was asked to show.
#[derive(Debug, Default)]
pub struct Recording {
    pub boards: Vec<Board>,
    pub statuses: Vec<String>,
    pub link: Vec<String>,
    pub results: Vec<String>,
    pub chat: Vec<String>,
    pub cues: Vec<Cue>,
    pub mute: bool,
}

impl Recording {
    pub fn status(&self) -> &str {
        self.statuses.last().map(String::as_str).unwrap_or("")
    }

    pub fn link_status(&self) -> &str {
        self.link.last().map(String::as_str).unwrap_or("")
    }

    pub fn board(&self) -> &Board {
        self.boards.last().expect("board rendered at least once")
    }
}

impl Presenter for Recording {
    fn render_board(&mut self, board: &Board) {
        self.boards.push(board.clone());
    }

    fn set_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }

    fn set_link_status(&mut self, text: &str) {
        self.link.push(text.to_string());
    }

    fn show_result(&mut self, text: &str) {
        self.results.push(text.to_string());
    }

    fn append_chat(&mut self, line: &str) {
        self.chat.push(line.to_string());
    }

    fn play(&mut self, cue: Cue) -> Result<(), PresentError> {
        self.cues.push(cue);
        if self.mute {
            return Err(PresentError::new("no audio device"));
        }
        Ok(())
    }
}

pub fn controller() -> MatchController<Recording> {
    MatchController::new(MatchConfig::default(), Recording::default())
}

pub fn controller_with(config: MatchConfig) -> MatchController<Recording> {
    MatchController::new(config, Recording::default())
}
