//! Line analysis for N×N boards: N rows, N columns and both diagonals.

use super::{Cell, Player};
use crate::types::Action;

/// Utility for analyzing lines on a square board stored row-major.
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// All lines of a `size × size` board as lists of row-major indices.
    ///
    /// Order: rows top to bottom, columns left to right, main diagonal,
    /// anti-diagonal.
    pub fn lines(size: usize) -> Vec<Vec<usize>> {
        let mut lines = Vec::with_capacity(2 * size + 2);
        for row in 0..size {
            lines.push((0..size).map(|col| row * size + col).collect());
        }
        for col in 0..size {
            lines.push((0..size).map(|row| row * size + col).collect());
        }
        lines.push((0..size).map(|i| i * size + i).collect());
        lines.push((0..size).map(|i| i * size + (size - 1 - i)).collect());
        lines
    }

    /// Check if `player` owns every cell of some row, column or diagonal.
    ///
    /// Short-circuits on the first complete line.
    pub fn has_won(cells: &[Cell], size: usize, player: Player) -> bool {
        let target = player.to_cell();
        Self::lines(size)
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// Find the first cell that would complete a line for `player`.
    ///
    /// A line qualifies when it holds `size - 1` of the player's marks and
    /// exactly one empty cell. Lines are searched in [`LineAnalyzer::lines`]
    /// order.
    pub fn completing_move(cells: &[Cell], size: usize, player: Player) -> Option<Action> {
        Self::lines(size)
            .iter()
            .find_map(|line| Self::completing_move_in_line(cells, player, line))
            .map(|idx| Action::from_index(idx, size))
    }

    fn completing_move_in_line(cells: &[Cell], player: Player, line: &[usize]) -> Option<usize> {
        let target = player.to_cell();
        let mut count = 0;
        let mut empty_pos = None;

        for &idx in line {
            match cells[idx] {
                Cell::Empty => {
                    if empty_pos.is_some() {
                        return None;
                    }
                    empty_pos = Some(idx);
                }
                c if c == target => count += 1,
                _ => return None,
            }
        }

        if count == line.len() - 1 { empty_pos } else { None }
    }
}
