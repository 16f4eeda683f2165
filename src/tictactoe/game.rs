//! Outcomes and move records

use serde::{Deserialize, Serialize};

use super::board::Player;
use crate::types::Action;

/// A move made during an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub action: Action,
    pub player: Player,
}

/// Outcome of a position from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    InProgress,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Terminal reward: +1 win, -1 loss, 0 draw (and 0 while in progress).
    pub fn reward(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => -1.0,
            Outcome::Draw | Outcome::InProgress => 0.0,
        }
    }
}

/// Final result of a finished episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    Win(Player),
    Draw,
}

impl EpisodeOutcome {
    /// View the result from `player`'s side.
    pub fn outcome_for(self, player: Player) -> Outcome {
        match self {
            EpisodeOutcome::Win(winner) if winner == player => Outcome::Win,
            EpisodeOutcome::Win(_) => Outcome::Loss,
            EpisodeOutcome::Draw => Outcome::Draw,
        }
    }

    pub fn reward_for(self, player: Player) -> f64 {
        self.outcome_for(player).reward()
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            EpisodeOutcome::Win(winner) => Some(winner),
            EpisodeOutcome::Draw => None,
        }
    }
}
