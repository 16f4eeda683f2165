//! Properties of the board environment

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tictactoe_td::{
    Error,
    tictactoe::{Board, Outcome, Player},
    types::Action,
};

fn lines(size: usize) -> Vec<Vec<Action>> {
    let mut lines = Vec::new();
    for i in 0..size {
        lines.push((0..size).map(|j| Action::new(i, j)).collect());
        lines.push((0..size).map(|j| Action::new(j, i)).collect());
    }
    lines.push((0..size).map(|i| Action::new(i, i)).collect());
    lines.push((0..size).map(|i| Action::new(i, size - 1 - i)).collect());
    lines
}

#[test]
fn completing_any_line_is_a_win() {
    for size in [3, 4, 5] {
        for line in lines(size) {
            let mut board = Board::new(size).unwrap();
            for &action in &line {
                assert_eq!(board.check_outcome(Player::O), Outcome::InProgress);
                board.apply(action, Player::O).unwrap();
            }
            assert_eq!(board.check_outcome(Player::O), Outcome::Win);
            assert_eq!(board.check_outcome(Player::X), Outcome::InProgress);
        }
    }
}

#[test]
fn full_board_without_line_is_a_draw() {
    let board = Board::from_rows(&["XOXO", "XOXO", "OXOX", "OXOX"]).unwrap();
    assert_eq!(board.check_outcome(Player::X), Outcome::Draw);
    assert_eq!(board.check_outcome(Player::O), Outcome::Draw);
}

#[test]
fn random_games_alternate_and_terminate() {
    let mut rng = StdRng::seed_from_u64(7);
    for size in [3, 4] {
        for _ in 0..200 {
            let mut board = Board::new(size).unwrap();
            let mut player = Player::X;
            let mut placed = 0;
            loop {
                let action = *board.empty_cells().choose(&mut rng).unwrap();
                board.apply(action, player).unwrap();
                placed += 1;

                let diff = board.count(Player::X) as isize - board.count(Player::O) as isize;
                assert!(diff.abs() <= 1);

                if board.check_outcome(player).is_terminal() {
                    break;
                }
                player = player.opponent();
            }
            assert!(placed <= size * size);
            assert_eq!(placed, size * size - board.empty_cells().len());
        }
    }
}

#[test]
fn illegal_moves_leave_the_board_unchanged() {
    let mut board = Board::from_rows(&["X--", "---", "---"]).unwrap();
    let before = board.clone();

    assert!(matches!(
        board.apply(Action::new(0, 0), Player::O),
        Err(Error::IllegalMove { .. })
    ));
    assert!(matches!(
        board.apply(Action::new(0, 3), Player::O),
        Err(Error::IllegalMove { .. })
    ));
    assert_eq!(board, before);
}

#[test]
fn state_key_is_stable_and_distinct() {
    let mut board = Board::new(3).unwrap();
    board.apply(Action::new(0, 0), Player::X).unwrap();
    let key = board.state_key();
    assert_eq!(key, board.state_key());

    let mut mirrored = Board::new(3).unwrap();
    mirrored.apply(Action::new(0, 2), Player::X).unwrap();
    assert_ne!(key, mirrored.state_key());

    board.reset();
    assert_eq!(board.state_key().as_str(), "---------");
}
