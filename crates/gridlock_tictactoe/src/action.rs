//! First-class move types for tic-tac-toe.
//!
//! Moves are domain events, not side effects. They carry the mark's intent
//! and are validated by the engine before anything touches the board.

use super::{Mark, Position};
use serde::{Deserialize, Serialize};

/// A move in tic-tac-toe: a mark placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The mark being placed.
    pub mark: Mark,
    /// Where it goes.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, position: Position) -> Self {
        Self { mark, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position.label())
    }
}

/// Why a move was refused.
///
/// Every variant is an illegal move: the engine leaves its state untouched
/// when it returns one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// Cell index outside 0-8.
    #[display("Cell {} is off the board", _0)]
    OutOfBounds(usize),

    /// The game is not accepting moves (finished or frozen).
    #[display("Game is not active")]
    GameOver,

    /// The game is paused.
    #[display("Game is paused")]
    Paused,

    /// It's not this mark's turn.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Mark),
}

impl std::error::Error for MoveError {}
