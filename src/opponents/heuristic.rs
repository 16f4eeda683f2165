//! Rule-based teacher
//!
//! The teacher plays a fixed priority ladder: win, block, center, corner,
//! side, random. With probability `1 - level` it ignores the ladder and
//! plays a random empty cell, so the learner sees mistakes as well.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    ports::Policy,
    tictactoe::{Board, LineAnalyzer, Player},
    types::Action,
};

/// Default probability of following the ladder.
pub const DEFAULT_LEVEL: f64 = 0.9;

/// Heuristic opponent used to train agents on larger boards.
///
/// # Examples
///
/// ```
/// use tictactoe_td::{
///     opponents::HeuristicTeacher,
///     ports::Policy,
///     tictactoe::{Board, Player},
///     types::Action,
/// };
///
/// // O can complete the middle row
/// let board = Board::from_rows(&["X-X", "OO-", "X--"]).unwrap();
/// let mut teacher = HeuristicTeacher::new(1.0).unwrap().with_seed(3);
/// assert_eq!(
///     teacher.select_move(&board, Player::O).unwrap(),
///     Some(Action::new(1, 2))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicTeacher {
    level: f64,
    rng: StdRng,
}

impl HeuristicTeacher {
    /// Create a teacher that follows the ladder with probability `level`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `level` is in [0, 1].
    pub fn new(level: f64) -> Result<Self> {
        if !(level.is_finite() && (0.0..=1.0).contains(&level)) {
            return Err(Error::config(format!(
                "teacher level must be in [0, 1], got {level}"
            )));
        }
        Ok(Self {
            level,
            rng: StdRng::from_rng(&mut rand::rng()),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Move that completes one of `player`'s lines.
    pub fn win_move(board: &Board, player: Player) -> Option<Action> {
        LineAnalyzer::completing_move(board.cells(), board.size(), player)
    }

    /// Move that stops `player`'s opponent from completing a line.
    pub fn block_move(board: &Board, player: Player) -> Option<Action> {
        Self::win_move(board, player.opponent())
    }

    /// Center cell, or the first empty of the four central cells on even
    /// boards.
    pub fn center_move(board: &Board) -> Option<Action> {
        let n = board.size();
        let half = n / 2;
        let candidates = if n % 2 == 1 {
            vec![Action::new(half, half)]
        } else {
            vec![
                Action::new(half - 1, half - 1),
                Action::new(half - 1, half),
                Action::new(half, half - 1),
                Action::new(half, half),
            ]
        };
        candidates.into_iter().find(|&a| board.is_legal(a))
    }

    /// First empty corner, clockwise from the top-left except that the
    /// bottom-left comes before the bottom-right.
    pub fn corner_move(board: &Board) -> Option<Action> {
        let last = board.size() - 1;
        [
            Action::new(0, 0),
            Action::new(0, last),
            Action::new(last, 0),
            Action::new(last, last),
        ]
        .into_iter()
        .find(|&a| board.is_legal(a))
    }

    /// Empty edge cells that are not corners.
    pub fn side_moves(board: &Board) -> Vec<Action> {
        let last = board.size() - 1;
        board
            .empty_cells()
            .into_iter()
            .filter(|a| {
                let on_edge = a.row == 0 || a.row == last || a.col == 0 || a.col == last;
                let is_corner = (a.row == 0 || a.row == last) && (a.col == 0 || a.col == last);
                on_edge && !is_corner
            })
            .collect()
    }

    fn ladder_move(&mut self, board: &Board, player: Player) -> Option<Action> {
        Self::win_move(board, player)
            .or_else(|| Self::block_move(board, player))
            .or_else(|| Self::center_move(board))
            .or_else(|| Self::corner_move(board))
            .or_else(|| Self::side_moves(board).choose(&mut self.rng).copied())
    }
}

impl Policy for HeuristicTeacher {
    fn select_move(&mut self, board: &Board, player: Player) -> Result<Option<Action>> {
        let empty = board.empty_cells();
        if empty.is_empty() {
            return Ok(None);
        }

        if self.rng.random::<f64>() > self.level {
            return Ok(empty.choose(&mut self.rng).copied());
        }

        let action = match self.ladder_move(board, player) {
            Some(action) => Some(action),
            None => empty.choose(&mut self.rng).copied(),
        };
        Ok(action)
    }

    fn name(&self) -> &str {
        "teacher"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}
