//! End-to-end move sequences through the rules engine.

use gridlock_tictactoe::{Board, Game, Mark, MoveError, Phase, Position, Square};

fn play(game: &mut Game, indices: &[usize]) -> Phase {
    let mut phase = game.phase();
    for &i in indices {
        let pos = Position::from_index(i).expect("index on board");
        phase = game.make_move(pos).expect("legal move");
    }
    phase
}

#[test]
fn test_middle_column_completes_for_x() {
    // X:4, O:0, X:1, O:2, X:7 puts X on 1-4-7.
    let mut game = Game::new();
    let phase = play(&mut game, &[4, 0, 1, 2, 7]);

    assert_eq!(phase, Phase::Won(Mark::X));
    assert_eq!(game.board().empty_positions().len(), 4);
    assert!(!game.turn().game_active());
}

#[test]
fn test_five_moves_without_a_line() {
    let mut game = Game::new();
    let phase = play(&mut game, &[4, 0, 1, 7, 2]);

    assert_eq!(phase, Phase::InProgress);
    assert_eq!(game.board().empty_positions().len(), 4);
    assert!(!game.board().check_win(Mark::X));
    assert!(!game.board().check_win(Mark::O));
    assert_eq!(game.to_move(), Mark::O);
}

#[test]
fn test_top_row_win_ends_game() {
    let mut game = Game::new();
    let phase = play(&mut game, &[0, 3, 1, 4, 2]);

    assert_eq!(phase, Phase::Won(Mark::X));
    assert_eq!(
        game.make_move(Position::BottomLeft),
        Err(MoveError::GameOver)
    );
    assert_eq!(game.board().get(Position::BottomLeft), Square::Empty);
}

#[test]
fn test_full_board_without_line_is_drawn() {
    let mut game = Game::new();
    let phase = play(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

    assert_eq!(phase, Phase::Drawn);
    assert!(game.board().is_full());
    assert_eq!(game.phase().winner(), None);
}

#[test]
fn test_reset_restores_empty_board() {
    let mut game = Game::new();
    play(&mut game, &[0, 3, 1, 4, 2]);
    game.reset();

    assert_eq!(game.phase(), Phase::WaitingFirstMove);
    assert_eq!(game.board(), &Board::new());
    assert_eq!(game.to_move(), Mark::X);
    assert!(game.turn().accepts_moves());
}

#[test]
fn test_cells_are_written_once() {
    let order = [4, 0, 8, 2, 1, 7, 6, 3, 5];
    let mut game = Game::new();
    let mut history: Vec<Board> = vec![game.board().clone()];

    for &i in &order {
        let pos = Position::from_index(i).unwrap();
        let before = game.board().clone();

        // Replaying an occupied square is refused and changes nothing.
        let occupied = order
            .iter()
            .map(|&j| Position::from_index(j).unwrap())
            .find(|&pos| !before.is_empty(pos));
        if let Some(taken) = occupied {
            assert_eq!(game.make_move(taken), Err(MoveError::SquareOccupied(taken)));
            assert_eq!(game.board(), &before);
        }

        if game.make_move(pos).is_err() {
            break;
        }
        history.push(game.board().clone());
    }

    for pair in history.windows(2) {
        for pos in Position::ALL {
            if let Square::Occupied(mark) = pair[0].get(pos) {
                assert_eq!(pair[1].get(pos), Square::Occupied(mark));
            }
        }
    }
}
