//! Board representation and the environment operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{game::Outcome, lines::LineAnalyzer};
use crate::{
    Error, Result,
    types::{Action, EMPTY_CHAR, MIN_BOARD_SIZE, StateKey},
};

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => EMPTY_CHAR,
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '-' | '.' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// Stable index (X = 0, O = 1) for per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Player::X => 0,
            Player::O => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// N×N tic-tac-toe board.
///
/// The board is the environment of an episode: it accepts single-cell
/// placements, reports the outcome for the player who just moved and
/// exposes the [`StateKey`] used by the value tables. Turn order is not
/// tracked here; the episode orchestrator owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `size < 3`.
    pub fn new(size: usize) -> Result<Self> {
        if size < MIN_BOARD_SIZE {
            return Err(Error::config(format!(
                "board size must be at least {MIN_BOARD_SIZE}, got {size}"
            )));
        }
        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Parse a board from one string per row, e.g. `["X-O", "---", "--X"]`.
    ///
    /// # Errors
    ///
    /// Returns error if the rows do not form a square of a supported size
    /// or contain characters other than `-`/`.`, `X`, `O`.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let mut board = Self::new(rows.len())?;
        for (row, text) in rows.iter().enumerate() {
            let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
            if chars.len() != board.size {
                return Err(Error::config(format!(
                    "row {row} has {} cells, expected {}",
                    chars.len(),
                    board.size
                )));
            }
            for (col, c) in chars.into_iter().enumerate() {
                let cell = Cell::from_char(c).ok_or_else(|| Error::InvalidStateKey {
                    key: text.to_string(),
                    reason: format!("unexpected character '{c}' at column {col}"),
                })?;
                board.cells[row * board.size + col] = cell;
            }
        }
        Ok(board)
    }

    /// Clear every cell, keeping the size.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get the cell at `action`, or `None` when out of range.
    pub fn cell(&self, action: Action) -> Option<Cell> {
        self.in_range(action)
            .then(|| self.cells[action.index(self.size)])
    }

    fn in_range(&self, action: Action) -> bool {
        action.row < self.size && action.col < self.size
    }

    /// Check whether `action` targets an empty in-range cell.
    pub fn is_legal(&self, action: Action) -> bool {
        self.cell(action) == Some(Cell::Empty)
    }

    /// Place `player`'s mark at `action`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] if the cell is out of range or
    /// already occupied. The board is left unchanged.
    pub fn apply(&mut self, action: Action, player: Player) -> Result<()> {
        let illegal = |reason: String| Error::IllegalMove {
            row: action.row,
            col: action.col,
            reason,
        };

        match self.cell(action) {
            None => Err(illegal(format!(
                "outside the {size}x{size} board",
                size = self.size
            ))),
            Some(Cell::Empty) => {
                let idx = action.index(self.size);
                self.cells[idx] = player.to_cell();
                Ok(())
            }
            Some(occupied) => Err(illegal(format!(
                "cell already holds {}",
                occupied.to_char()
            ))),
        }
    }

    /// Outcome of the position from `player`'s point of view.
    ///
    /// `Win` if the player owns a full row, column or diagonal, `Draw` if
    /// no cell is empty, otherwise `InProgress`. Never returns `Loss`; call
    /// this for the player who just moved.
    pub fn check_outcome(&self, player: Player) -> Outcome {
        if LineAnalyzer::has_won(&self.cells, self.size, player) {
            Outcome::Win
        } else if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    /// Canonical key of the current position.
    pub fn state_key(&self) -> StateKey {
        StateKey::from_chars(self.cells.iter().map(|c| c.to_char()))
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Action> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| Action::from_index(i, self.size))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Number of marks `player` has on the board.
    pub fn count(&self, player: Player) -> usize {
        let target = player.to_cell();
        self.cells.iter().filter(|&&c| c == target).count()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.len() - self.empty_cells().len()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = (0..self.size).map(|i| i.to_string()).collect();
        writeln!(f, "    {}", header.join("   "))?;
        writeln!(f)?;
        for (row, cells) in self.cells.chunks(self.size).enumerate() {
            let marks: Vec<String> = cells.iter().map(|c| c.to_char().to_string()).collect();
            writeln!(f, "{row}   {}", marks.join("   "))?;
            writeln!(f)?;
        }
        Ok(())
    }
}
