//! Pro tier.
//!
//! Exhaustive minimax with depth-sensitive scores: a win scores
//! `10 - depth`, a loss `depth - 10`, a draw zero. Faster wins and slower
//! losses are preferred.

use super::Strategy;
use crate::{Board, Mark, Position};
use rand::RngCore;

/// Perfect play. Ties go to the first square in index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxStrategy;

impl Strategy for MinimaxStrategy {
    fn choose(&self, board: &Board, mark: Mark, _rng: &mut dyn RngCore) -> Option<Position> {
        best_move(board, mark)
    }
}

/// Scores every empty square for `mark` and returns the strictly best one.
pub fn best_move(board: &Board, mark: Mark) -> Option<Position> {
    let mut scratch = board.snapshot();
    let mut best: Option<(Position, i32)> = None;

    for pos in board.empty_positions() {
        if scratch.place(pos, mark).is_err() {
            continue;
        }
        let score = minimax(&mut scratch, mark, 0, false);
        scratch.lift(pos);

        if best.is_none_or(|(_, top)| score > top) {
            best = Some((pos, score));
        }
    }

    best.map(|(pos, _)| pos)
}

fn minimax(board: &mut Board, me: Mark, depth: i32, maximizing: bool) -> i32 {
    if board.check_win(me) {
        return 10 - depth;
    }
    if board.check_win(me.opponent()) {
        return depth - 10;
    }
    if board.is_full() {
        return 0;
    }

    let mover = if maximizing { me } else { me.opponent() };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for pos in board.empty_positions() {
        if board.place(pos, mover).is_err() {
            continue;
        }
        let score = minimax(board, me, depth + 1, !maximizing);
        board.lift(pos);

        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}
