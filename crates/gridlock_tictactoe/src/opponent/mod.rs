//! Computer opponents.
//!
//! A [`Strategy`] picks a square for a mark given a board. Strategies never
//! check whether the game is active or paused; callers gate invocation.

mod heuristic;
mod minimax;
mod random;

pub use heuristic::HeuristicStrategy;
pub use minimax::MinimaxStrategy;
pub use random::RandomStrategy;

use crate::{Board, Mark, Position};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Picks a square for `mark`.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    /// Returns an empty square, or `None` on a full board.
    fn choose(&self, board: &Board, mark: Mark, rng: &mut dyn RngCore) -> Option<Position>;
}

/// Difficulty tier of the computer opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniform random play.
    #[default]
    Beginner,
    /// Completes or blocks two-in-a-line, then center, then random.
    Amateur,
    /// Perfect play via minimax.
    Pro,
}

impl Difficulty {
    /// The strategy backing this tier.
    pub fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Difficulty::Beginner => Box::new(RandomStrategy),
            Difficulty::Amateur => Box::new(HeuristicStrategy),
            Difficulty::Pro => Box::new(MinimaxStrategy),
        }
    }
}

/// A computer player bound to one mark.
#[derive(Debug)]
pub struct Opponent {
    difficulty: Difficulty,
    mark: Mark,
    strategy: Box<dyn Strategy>,
    rng: StdRng,
}

impl Opponent {
    /// Creates an opponent seeded from OS entropy.
    pub fn new(difficulty: Difficulty, mark: Mark) -> Self {
        Self::with_rng(difficulty, mark, StdRng::from_entropy())
    }

    /// Creates an opponent with reproducible choices.
    pub fn seeded(difficulty: Difficulty, mark: Mark, seed: u64) -> Self {
        Self::with_rng(difficulty, mark, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, mark: Mark, rng: StdRng) -> Self {
        Self {
            difficulty,
            mark,
            strategy: difficulty.strategy(),
            rng,
        }
    }

    /// Current difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The mark this opponent plays.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Switches tiers, keeping the random stream.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.strategy = difficulty.strategy();
    }

    /// Picks the next square.
    #[instrument(skip(self, board), fields(difficulty = %self.difficulty, mark = %self.mark))]
    pub fn choose_move(&mut self, board: &Board) -> Option<Position> {
        let choice = self.strategy.choose(board, self.mark, &mut self.rng);
        debug!(?choice, "Computer chose square");
        choice
    }
}
