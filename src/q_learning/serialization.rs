//! Serialization support for temporal difference learning agents.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::agent::{TdAgent, TdAgentState, TdAlgorithm},
};

/// What the agent was trained on, stored next to its value table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub episodes_trained: usize,
    /// Name of the opponent policy (`"self-play"` for self-play)
    pub opponent: String,
    pub board_size: usize,
    pub seed: Option<u64>,
    /// One terminal reward per training episode
    #[serde(default)]
    pub rewards: Vec<f64>,
}

impl TrainingMetadata {
    pub fn new(opponent: impl Into<String>, board_size: usize) -> Self {
        Self {
            opponent: opponent.into(),
            board_size,
            ..Self::default()
        }
    }

    /// Append one training run's episode rewards.
    pub fn record_run(&mut self, rewards: &[f64]) {
        self.episodes_trained += rewards.len();
        self.rewards.extend_from_slice(rewards);
    }
}

/// Versioned envelope for a persisted agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAgent {
    pub version: u32,
    pub algorithm: TdAlgorithm,
    state: TdAgentState,
    pub metadata: TrainingMetadata,
}

impl SavedAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &TdAgent, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            algorithm: agent.algorithm(),
            state: agent.export_state(),
            metadata,
        }
    }

    /// Rebuild the agent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] for envelopes written by a
    /// different format version, or [`Error::InvalidConfiguration`] if the
    /// stored hyperparameters are out of range.
    pub fn to_agent(&self) -> Result<TdAgent> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        TdAgent::from_state(self.algorithm, self.state.clone())
    }

    /// Number of `(state, action)` entries in the stored value table.
    pub fn q_table_size(&self) -> usize {
        self.state.q_table.size()
    }

    pub fn epsilon(&self) -> f64 {
        self.state.epsilon
    }

    /// Encode as MessagePack.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(|e| Error::SerializationContext {
            operation: "encode agent".to_string(),
            message: e.to_string(),
        })
    }

    /// Decode from MessagePack.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "decode agent".to_string(),
            message: e.to_string(),
        })
    }
}
