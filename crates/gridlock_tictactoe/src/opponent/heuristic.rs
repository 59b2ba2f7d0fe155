//! Amateur tier.
//!
//! Lines are scanned in [`WINNING_LINES`] order. Within a line the
//! computer's own two-in-a-line is checked before the opponent's, but a
//! block on an earlier line beats a win on a later one: offense and defense
//! share a single priority tier.

use super::{RandomStrategy, Strategy};
use crate::rules::WINNING_LINES;
use crate::{Board, Mark, Position, Square};
use rand::RngCore;

/// Completes or blocks the first two-in-a-line found, else takes the center,
/// else plays randomly.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy;

impl Strategy for HeuristicStrategy {
    fn choose(&self, board: &Board, mark: Mark, rng: &mut dyn RngCore) -> Option<Position> {
        for line in &WINNING_LINES {
            for side in [mark, mark.opponent()] {
                if let Some(pos) = open_third(board, line, side) {
                    return Some(pos);
                }
            }
        }

        if board.is_empty(Position::Center) {
            return Some(Position::Center);
        }

        RandomStrategy.choose(board, mark, rng)
    }
}

/// The empty square of a line whose other two hold `side`. The third cell is
/// checked first, then the middle, then the first.
fn open_third(board: &Board, line: &[Position; 3], side: Mark) -> Option<Position> {
    let [a, b, c] = *line;
    let held = Square::Occupied(side);
    let (sa, sb, sc) = (board.get(a), board.get(b), board.get(c));

    if sa == held && sb == held && sc == Square::Empty {
        Some(c)
    } else if sa == held && sb == Square::Empty && sc == held {
        Some(b)
    } else if sa == Square::Empty && sb == held && sc == held {
        Some(a)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn choose(board: &Board, mark: Mark) -> Option<Position> {
        let mut rng = StdRng::seed_from_u64(3);
        HeuristicStrategy.choose(board, mark, &mut rng)
    }

    #[test]
    fn test_blocks_opponent_pair() {
        use Mark::{O, X};
        #[rustfmt::skip]
        let board = Board::from_cells([
            Some(X), Some(X), None,
            None, Some(O), None,
            None, None, None,
        ]);
        assert_eq!(choose(&board, O), Some(Position::TopRight));
    }

    #[test]
    fn test_completes_own_pair() {
        use Mark::{O, X};
        #[rustfmt::skip]
        let board = Board::from_cells([
            Some(X), None, None,
            Some(O), Some(O), None,
            Some(X), None, None,
        ]);
        assert_eq!(choose(&board, O), Some(Position::MiddleRight));
    }

    #[test]
    fn test_earlier_line_block_beats_later_win() {
        use Mark::{O, X};
        // X threatens the middle row; O could win on the bottom row, which
        // is scanned later.
        #[rustfmt::skip]
        let board = Board::from_cells([
            None, None, Some(X),
            Some(X), Some(X), None,
            Some(O), Some(O), None,
        ]);
        assert_eq!(choose(&board, O), Some(Position::MiddleRight));
    }

    #[test]
    fn test_checks_middle_and_first_gaps() {
        use Mark::{O, X};
        #[rustfmt::skip]
        let gap_middle = Board::from_cells([
            Some(X), None, Some(X),
            None, Some(O), None,
            None, None, None,
        ]);
        assert_eq!(choose(&gap_middle, O), Some(Position::TopCenter));

        #[rustfmt::skip]
        let gap_first = Board::from_cells([
            None, Some(X), Some(X),
            None, Some(O), None,
            None, None, None,
        ]);
        assert_eq!(choose(&gap_first, O), Some(Position::TopLeft));
    }

    #[test]
    fn test_takes_center_without_threats() {
        let mut board = Board::new();
        board.place(Position::TopLeft, Mark::X).unwrap();
        assert_eq!(choose(&board, Mark::O), Some(Position::Center));
    }

    #[test]
    fn test_random_fallback_when_center_taken() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X).unwrap();
        let pick = choose(&board, Mark::O).unwrap();
        assert!(board.is_empty(pick));
    }
}
