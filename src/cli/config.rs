//! Shared configuration types for CLI commands

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use crate::q_learning::{AgentConfig, TdAlgorithm};

/// TD algorithm selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AlgorithmArg {
    /// Q-learning
    #[default]
    #[value(alias = "q-learning")]
    Q,
    /// SARSA
    #[value(alias = "s")]
    Sarsa,
}

impl From<AlgorithmArg> for TdAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Q => TdAlgorithm::QLearning,
            AlgorithmArg::Sarsa => TdAlgorithm::Sarsa,
        }
    }
}

/// Hyperparameters shared by every command that creates an agent
#[derive(Args, Debug, Clone)]
pub struct HyperparameterArgs {
    /// Learning algorithm
    #[arg(long, short = 'a', value_enum, default_value_t = AlgorithmArg::Q)]
    pub algorithm: AlgorithmArg,

    /// Learning rate α
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Initial exploration rate ε
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Amount subtracted from ε after every episode
    /// (default: 0 for self-play, 0.001 otherwise)
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Floor for ε
    #[arg(long, default_value_t = 0.0)]
    pub min_epsilon: f64,
}

impl HyperparameterArgs {
    pub fn algorithm(&self) -> TdAlgorithm {
        self.algorithm.into()
    }

    /// Build the agent configuration, using `default_decay` when
    /// `--epsilon-decay` was not given.
    pub fn agent_config(&self, default_decay: f64, seed: Option<u64>) -> AgentConfig {
        let config = AgentConfig::default()
            .with_learning_rate(self.alpha)
            .with_discount_factor(self.gamma)
            .with_epsilon(self.epsilon)
            .with_epsilon_decay(self.epsilon_decay.unwrap_or(default_decay))
            .with_min_epsilon(self.min_epsilon);
        match seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

/// Default save location for a single agent, e.g. `q_agent_4x4.msgpack`.
pub fn default_agent_path(algorithm: TdAlgorithm, board_size: usize) -> PathBuf {
    PathBuf::from(format!(
        "{}_agent_{board_size}x{board_size}.msgpack",
        algorithm.tag()
    ))
}

/// Checkpoint file inside `dir`, e.g. `agent1_q_5000.msgpack`.
pub fn checkpoint_path(dir: &Path, slot: usize, algorithm: TdAlgorithm, label: &str) -> PathBuf {
    dir.join(format!("agent{slot}_{}_{label}.msgpack", algorithm.tag()))
}
