//! N×N tic-tac-toe environment

pub mod board;
pub mod game;
pub mod lines;

pub use board::{Board, Cell, Player};
pub use game::{EpisodeOutcome, Move, Outcome};
pub use lines::LineAnalyzer;
