//! Tabular temporal difference learning for N×N tic-tac-toe
//!
//! This crate provides:
//! - An N×N tic-tac-toe environment with exhaustive line-based win detection
//! - Q-learning and SARSA agents with ε-greedy exploration and decay
//! - An episode orchestrator that feeds each agent its own transitions
//! - A rule-based teacher, a random baseline and an interactive human player
//! - Training pipelines with observers, checkpoints and persistence
//! - Reward-curve export for plotting learning progress

pub mod adapters;
pub mod cli;
pub mod error;
pub mod export;
pub mod opponents;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use pipeline::{EpisodeReport, EpisodeRunner, Participant, TrainingPipeline};
pub use q_learning::{AgentConfig, SavedAgent, TdAgent, TdAlgorithm};
pub use tictactoe::{Board, EpisodeOutcome, Outcome, Player};
pub use types::{Action, StateKey};
