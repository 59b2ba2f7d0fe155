//! Gridlock tic-tac-toe core.
//!
//! # Architecture
//!
//! - **Board**: the 9-square grid, placement and win/draw queries
//! - **Rules**: pure line and draw checks shared by everything else
//! - **Game**: turn sequencing, pause, terminal detection
//! - **Opponent**: random, heuristic and minimax computer players

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
mod position;
mod types;

pub mod opponent;
pub mod rules;

pub use action::{Move, MoveError};
pub use game::{Game, Phase, TurnState};
pub use opponent::{Difficulty, Opponent, Strategy};
pub use position::Position;
pub use types::{Board, Mark, Square};
