//! Interactive human player
//!
//! Reads `row,col` moves from any [`BufRead`] and writes prompts and the
//! board to any [`Write`], so the same code drives a terminal session and
//! scripted tests. Malformed or illegal input is answered with a message
//! and a fresh prompt; only end of input escapes as an error.

use std::io::{BufRead, Write};

use crate::{
    Error, Result,
    ports::Policy,
    tictactoe::{Board, Player},
    types::Action,
};

/// Human player reading moves from `input` and writing to `output`.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
///
/// use tictactoe_td::{
///     opponents::HumanPlayer,
///     ports::Policy,
///     tictactoe::{Board, Player},
///     types::Action,
/// };
///
/// let input = Cursor::new("oops\n1,1\n");
/// let mut human = HumanPlayer::new(input, Vec::new());
/// let board = Board::new(3).unwrap();
/// assert_eq!(
///     human.select_move(&board, Player::X).unwrap(),
///     Some(Action::new(1, 1))
/// );
/// ```
#[derive(Debug)]
pub struct HumanPlayer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the player, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write a line to the player's output.
    pub fn say(&mut self, message: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{message}").map_err(|source| Error::Io {
            operation: "write to player".to_string(),
            source,
        })
    }

    fn prompt(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")
            .and_then(|()| self.output.flush())
            .map_err(|source| Error::Io {
                operation: "write prompt".to_string(),
                source,
            })?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|source| Error::Io {
                operation: "read player input".to_string(),
                source,
            })?;
        if read == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim().to_lowercase())
    }

    /// Ask a yes/no question until the answer is `y`/`yes` or `n`/`no`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputClosed`] at end of input.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            match self.prompt(&format!("{question} [y/n]: "))?.as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Invalid input. Please enter 'y' or 'n'.")?,
            }
        }
    }
}

fn parse_move(text: &str) -> Option<Action> {
    let (row, col) = text.split_once(',')?;
    Some(Action::new(row.trim().parse().ok()?, col.trim().parse().ok()?))
}

impl<R: BufRead, W: Write> Policy for HumanPlayer<R, W> {
    fn select_move(&mut self, board: &Board, _player: Player) -> Result<Option<Action>> {
        if board.is_full() {
            return Ok(None);
        }

        self.say(board)?;
        let prompt = format!(
            "Your move! Please select a row and column from 0-{} in the format row,col: ",
            board.size() - 1
        );
        loop {
            let text = self.prompt(&prompt)?;
            let Some(action) = parse_move(&text) else {
                self.say("INVALID INPUT! Please use the correct format (e.g., 1,2).")?;
                continue;
            };
            if !board.is_legal(action) {
                self.say("INVALID MOVE! Choose again.")?;
                continue;
            }
            return Ok(Some(action));
        }
    }

    fn name(&self) -> &str {
        "human"
    }
}
