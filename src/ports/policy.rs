//! Policy port - abstraction for non-learning participants
//!
//! A policy picks moves for one side of an episode but never receives
//! training updates. Heuristic teachers, human players and random
//! baselines all plug in through this trait.

use crate::{
    Result,
    tictactoe::{Board, Player},
    types::Action,
};

/// A move-selection capability that does not learn.
///
/// # Examples
///
/// ```
/// use tictactoe_td::{
///     ports::Policy,
///     tictactoe::{Board, Player},
///     types::Action,
/// };
///
/// /// Always plays the first empty cell.
/// struct FirstEmpty;
///
/// impl Policy for FirstEmpty {
///     fn select_move(
///         &mut self,
///         board: &Board,
///         _player: Player,
///     ) -> tictactoe_td::Result<Option<Action>> {
///         Ok(board.empty_cells().first().copied())
///     }
///
///     fn name(&self) -> &str {
///         "first-empty"
///     }
/// }
///
/// let board = Board::new(3).unwrap();
/// assert_eq!(
///     FirstEmpty.select_move(&board, Player::X).unwrap(),
///     Some(Action::new(0, 0))
/// );
/// ```
pub trait Policy {
    /// Choose a move for `player` on `board`.
    ///
    /// Returns `Ok(None)` only when the board has no empty cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy cannot produce a move, e.g. when
    /// interactive input is closed.
    fn select_move(&mut self, board: &Board, player: Player) -> Result<Option<Action>>;

    /// Human-readable name used in logs and saved metadata.
    fn name(&self) -> &str;

    /// Re-seed the policy's random source, if it has one.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
