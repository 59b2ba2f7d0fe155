//! Turn sequencing and end-of-game detection.

use super::action::{Move, MoveError};
use super::types::{Board, Mark};
use super::Position;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Where a match stands.
///
/// `WaitingFirstMove -> InProgress -> {Won, Drawn}`; only a reset leaves a
/// terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Empty board, X to move.
    WaitingFirstMove,
    /// At least one mark placed, no result yet.
    InProgress,
    /// A mark completed a line.
    Won(Mark),
    /// Board full without a line.
    Drawn,
}

impl Phase {
    /// Won or Drawn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Won(_) | Phase::Drawn)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Phase::Won(mark) => Some(*mark),
            _ => None,
        }
    }
}

/// Whose turn it is and whether moves are accepted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    active_mark: Mark,
    game_active: bool,
    paused: bool,
}

impl TurnState {
    fn fresh() -> Self {
        Self {
            active_mark: Mark::X,
            game_active: true,
            paused: false,
        }
    }

    /// Mark whose turn it is.
    pub fn active_mark(&self) -> Mark {
        self.active_mark
    }

    /// False once the game has ended or been frozen.
    pub fn game_active(&self) -> bool {
        self.game_active
    }

    /// True while paused.
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Moves are accepted only when active and not paused.
    pub fn accepts_moves(&self) -> bool {
        self.game_active && !self.paused
    }
}

/// Tic-tac-toe rules engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: TurnState,
    phase: Phase,
}

impl Game {
    /// Creates a new game with an empty board and X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: TurnState::fresh(),
            phase: Phase::WaitingFirstMove,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the turn state.
    pub fn turn(&self) -> TurnState {
        self.turn
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Mark whose turn it is.
    pub fn to_move(&self) -> Mark {
        self.turn.active_mark
    }

    /// Places the mark whose turn it is.
    #[instrument(skip(self))]
    pub fn make_move(&mut self, pos: Position) -> Result<Phase, MoveError> {
        self.play(Move::new(self.turn.active_mark, pos))
    }

    /// Applies a move on behalf of `mv.mark`.
    ///
    /// Only the mark that just moved is checked for a win; a move cannot
    /// complete a line for the other side.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn play(&mut self, mv: Move) -> Result<Phase, MoveError> {
        if !self.turn.game_active {
            return Err(MoveError::GameOver);
        }
        if self.turn.paused {
            return Err(MoveError::Paused);
        }
        if mv.mark != self.turn.active_mark {
            return Err(MoveError::WrongPlayer(mv.mark));
        }

        self.board.place(mv.position, mv.mark)?;

        let phase = self.settle(mv.mark);
        if !phase.is_terminal() {
            self.turn.active_mark = mv.mark.opponent();
        }
        debug!(%mv, ?phase, "Move applied");
        Ok(phase)
    }

    /// Wipes the board and starts over with X to move.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Flips the pause flag. Returns the new value, or `None` when the game
    /// is not active and the flag stays put.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        if !self.turn.game_active {
            return None;
        }
        self.turn.paused = !self.turn.paused;
        Some(self.turn.paused)
    }

    /// Stops accepting moves without touching the board.
    pub fn freeze(&mut self) {
        self.turn.game_active = false;
    }

    /// Accepts moves again unless the game already has a result.
    pub fn activate(&mut self) {
        if !self.phase.is_terminal() {
            self.turn.game_active = true;
        }
    }

    /// Adopts a peer's board after their move and hands the turn over.
    ///
    /// The mark with more pieces (O on a tie) is taken as the one that just
    /// moved; it is the only one checked for a win and the turn passes to the
    /// other mark. A snapshot that repeats an earlier sync therefore leaves
    /// the turn where it was.
    #[instrument(skip(self, board))]
    pub fn adopt_move(&mut self, board: Board) -> Phase {
        self.board = board;
        let last = last_mover(&self.board);
        self.turn.active_mark = last.opponent();
        self.settle(last)
    }

    /// Adopts a peer's board wholesale and re-derives whose turn it is from
    /// the piece counts.
    #[instrument(skip(self, board))]
    pub fn resync(&mut self, board: Board) -> Phase {
        self.board = board;
        let last = last_mover(&self.board);
        self.turn.active_mark = if self.board.is_blank() {
            Mark::X
        } else {
            last.opponent()
        };
        self.settle(last)
    }

    /// Starts over from a peer's clear: their board, X to move, active and
    /// unpaused.
    #[instrument(skip(self, board))]
    pub fn clear_to(&mut self, board: Board) -> Phase {
        self.turn = TurnState::fresh();
        self.board = board;
        let last = last_mover(&self.board);
        self.settle(last)
    }

    fn settle(&mut self, mover: Mark) -> Phase {
        self.phase = if self.board.check_win(mover) {
            Phase::Won(mover)
        } else if self.board.is_full() {
            Phase::Drawn
        } else if self.board.is_blank() {
            Phase::WaitingFirstMove
        } else {
            Phase::InProgress
        };
        if self.phase.is_terminal() {
            self.turn.game_active = false;
        }
        self.phase
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

fn last_mover(board: &Board) -> Mark {
    if board.count(Mark::X) > board.count(Mark::O) {
        Mark::X
    } else {
        Mark::O
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_waits_for_x() {
        let game = Game::new();
        assert_eq!(game.phase(), Phase::WaitingFirstMove);
        assert_eq!(game.to_move(), Mark::X);
        assert!(game.turn().accepts_moves());
    }

    #[test]
    fn test_moves_alternate() {
        let mut game = Game::new();
        assert_eq!(game.make_move(Position::Center), Ok(Phase::InProgress));
        assert_eq!(game.to_move(), Mark::O);
        assert_eq!(game.make_move(Position::TopLeft), Ok(Phase::InProgress));
        assert_eq!(game.to_move(), Mark::X);
    }

    #[test]
    fn test_wrong_mark_rejected_without_change() {
        let mut game = Game::new();
        let before = game.clone();
        let result = game.play(Move::new(Mark::O, Position::Center));
        assert_eq!(result, Err(MoveError::WrongPlayer(Mark::O)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_paused_game_rejects_moves_and_keeps_phase() {
        let mut game = Game::new();
        game.make_move(Position::Center).unwrap();
        assert_eq!(game.toggle_pause(), Some(true));
        assert_eq!(game.make_move(Position::TopLeft), Err(MoveError::Paused));
        assert_eq!(game.phase(), Phase::InProgress);
        assert_eq!(game.toggle_pause(), Some(false));
        assert!(game.make_move(Position::TopLeft).is_ok());
    }

    #[test]
    fn test_pause_ignored_when_inactive() {
        let mut game = Game::new();
        game.freeze();
        assert_eq!(game.toggle_pause(), None);
        assert!(!game.turn().paused());
    }

    #[test]
    fn test_adopt_move_hands_turn_over() {
        let mut game = Game::new();
        let mut remote = Board::new();
        remote.place(Position::Center, Mark::X).unwrap();

        assert_eq!(game.adopt_move(remote), Phase::InProgress);
        assert_eq!(game.to_move(), Mark::O);
        assert_eq!(game.board().count(Mark::X), 1);
    }

    #[test]
    fn test_adopt_move_detects_remote_win() {
        use Mark::{O, X};
        let mut game = Game::new();
        #[rustfmt::skip]
        let remote = Board::from_cells([
            Some(X), Some(X), Some(X),
            Some(O), Some(O), None,
            None, None, None,
        ]);
        assert_eq!(game.adopt_move(remote), Phase::Won(X));
        assert!(!game.turn().game_active());
    }

    #[test]
    fn test_adopt_after_resync_of_same_board() {
        let mut game = Game::new();
        let mut remote = Board::new();
        remote.place(Position::Center, Mark::X).unwrap();

        game.resync(remote.clone());
        assert_eq!(game.adopt_move(remote), Phase::InProgress);
        assert_eq!(game.to_move(), Mark::O);
    }

    #[test]
    fn test_resync_derives_turn_from_counts() {
        use Mark::{O, X};
        let mut game = Game::new();
        #[rustfmt::skip]
        let remote = Board::from_cells([
            Some(X), Some(O), Some(X),
            None, None, None,
            None, None, None,
        ]);
        assert_eq!(game.resync(remote), Phase::InProgress);
        assert_eq!(game.to_move(), O);

        assert_eq!(game.resync(Board::new()), Phase::WaitingFirstMove);
        assert_eq!(game.to_move(), X);
    }

    #[test]
    fn test_clear_to_reopens_frozen_game() {
        let mut game = Game::new();
        game.make_move(Position::Center).unwrap();
        game.freeze();
        assert_eq!(game.clear_to(Board::new()), Phase::WaitingFirstMove);
        assert!(game.turn().accepts_moves());
        assert_eq!(game.to_move(), Mark::X);
    }

    #[test]
    fn test_activate_keeps_finished_game_closed() {
        let mut game = Game::new();
        for pos in [
            Position::TopLeft,
            Position::MiddleLeft,
            Position::TopCenter,
            Position::Center,
            Position::TopRight,
        ] {
            game.make_move(pos).unwrap();
        }
        assert_eq!(game.phase(), Phase::Won(Mark::X));
        game.activate();
        assert!(!game.turn().game_active());
    }
}
