//! Win detection logic for tic-tac-toe.

use crate::{Board, Mark, Position, Square};

/// The eight lines that win when uniformly occupied: rows, columns,
/// diagonals, in that order.
pub const WINNING_LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns true if `mark` holds all three squares of any line.
pub fn check_win(board: &Board, mark: Mark) -> bool {
    let wanted = Square::Occupied(mark);
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|pos| board.get(*pos) == wanted))
}

/// Returns the mark holding a complete line, X checked first.
pub fn winner(board: &Board) -> Option<Mark> {
    [Mark::X, Mark::O]
        .into_iter()
        .find(|mark| check_win(board, *mark))
}
