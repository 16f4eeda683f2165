//! Newtype wrappers for actions and state keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest supported board size.
pub const MIN_BOARD_SIZE: usize = 3;

/// Character used for an empty cell in a [`StateKey`].
pub const EMPTY_CHAR: char = '-';

/// A `(row, column)` placement on the board.
///
/// An action is only meaningful relative to a board: it is legal when it
/// is in range and the targeted cell is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index of this action on a board of the given size.
    pub fn index(&self, size: usize) -> usize {
        self.row * size + self.col
    }

    /// Inverse of [`Action::index`].
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            row: index / size,
            col: index % size,
        }
    }
}

impl From<(usize, usize)> for Action {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Canonical, order-preserving serialization of a board.
///
/// One character per cell in row-major order: `-` for empty, `X` and `O`
/// for the two players. Two boards are the same state iff their keys are
/// equal; no symmetry folding is applied.
///
/// # Examples
///
/// ```
/// use tictactoe_td::tictactoe::{Board, Player};
/// use tictactoe_td::types::{Action, StateKey};
///
/// let mut board = Board::new(3).unwrap();
/// board.apply(Action::new(1, 1), Player::X).unwrap();
/// assert_eq!(board.state_key().as_str(), "----X----");
///
/// let parsed = StateKey::parse("----X----").unwrap();
/// assert_eq!(parsed, board.state_key());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(String);

impl StateKey {
    /// Parse and validate a state key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidStateKey`] if the key contains a
    /// character other than `-`, `X`, `O`, or if its length is not the
    /// square of a supported board size.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let invalid = |reason: String| crate::Error::InvalidStateKey {
            key: s.to_string(),
            reason,
        };

        if let Some(bad) = s.chars().find(|c| !matches!(*c, EMPTY_CHAR | 'X' | 'O')) {
            return Err(invalid(format!("unexpected character '{bad}'")));
        }

        let len = s.chars().count();
        match Self::size_for_len(len) {
            Some(size) if size >= MIN_BOARD_SIZE => Ok(StateKey(s.to_string())),
            _ => Err(invalid(format!(
                "length {len} is not the square of a board size >= {MIN_BOARD_SIZE}"
            ))),
        }
    }

    /// Build a key from already-validated cell characters.
    pub(crate) fn from_chars<I: IntoIterator<Item = char>>(chars: I) -> Self {
        StateKey(chars.into_iter().collect())
    }

    fn size_for_len(len: usize) -> Option<usize> {
        let size = (len as f64).sqrt().round() as usize;
        (size * size == len).then_some(size)
    }

    /// Side length of the encoded board.
    pub fn board_size(&self) -> usize {
        Self::size_for_len(self.0.len()).unwrap_or(0)
    }

    /// Empty cells of the encoded board, in row-major order.
    pub fn empty_cells(&self) -> Vec<Action> {
        let size = self.board_size();
        if size == 0 {
            return Vec::new();
        }
        self.0
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == EMPTY_CHAR)
            .map(|(i, _)| Action::from_index(i, size))
            .collect()
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_index_roundtrip() {
        let action = Action::new(2, 1);
        assert_eq!(action.index(4), 9);
        assert_eq!(Action::from_index(9, 4), action);
    }

    #[test]
    fn test_state_key_validation() {
        assert!(StateKey::parse("---------").is_ok());
        assert!(StateKey::parse("XO-X-O---").is_ok());
        assert!(StateKey::parse("----------------").is_ok());
        assert!(StateKey::parse("----").is_err()); // 2x2 is too small
        assert!(StateKey::parse("--------").is_err());
        assert!(StateKey::parse("X.O------").is_err());
    }

    #[test]
    fn test_state_key_names_the_bad_character() {
        let err = StateKey::parse("XO-x-----").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::InvalidStateKey { ref reason, .. } if reason.contains("'x'")
        ));
    }

    #[test]
    fn test_state_key_empty_cells() {
        let key = StateKey::parse("XO-X-O--X").unwrap();
        assert_eq!(key.board_size(), 3);
        assert_eq!(
            key.empty_cells(),
            vec![
                Action::new(0, 2),
                Action::new(1, 1),
                Action::new(2, 0),
                Action::new(2, 1),
            ]
        );
    }
}
