//! Beginner tier.

use super::Strategy;
use crate::{Board, Mark, Position};
use rand::RngCore;
use rand::seq::SliceRandom;

/// Picks a uniformly random empty square.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn choose(&self, board: &Board, _mark: Mark, rng: &mut dyn RngCore) -> Option<Position> {
        board.empty_positions().choose(rng).copied()
    }
}
