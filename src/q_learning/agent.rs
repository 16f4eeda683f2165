//! Q-learning and SARSA agents
//!
//! This module implements the temporal difference learning agent that
//! owns a Q-table, selects actions ε-greedily and applies the TD rule of
//! its algorithm.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    q_learning::{config::AgentConfig, q_table::QTable},
    types::{Action, StateKey},
};

/// Which TD control rule the agent applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdAlgorithm {
    /// Off-policy: bootstraps from max_a' Q(s',a')
    QLearning,
    /// On-policy: bootstraps from Q(s',a') for the action actually taken
    Sarsa,
}

impl TdAlgorithm {
    /// Short tag used in file names (`q` / `sarsa`).
    pub fn tag(self) -> &'static str {
        match self {
            TdAlgorithm::QLearning => "q",
            TdAlgorithm::Sarsa => "sarsa",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TdAlgorithm::QLearning => "Q-Learning",
            TdAlgorithm::Sarsa => "SARSA",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TdAgentState {
    pub q_table: QTable,
    pub epsilon: f64,
    pub config: AgentConfig,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular TD agent (Q-learning or SARSA)
///
/// The agent has no notion of turns: the episode orchestrator passes in
/// every state, legal action set and transition. Its only persistent state
/// is the Q-table and the current exploration rate.
///
/// # Examples
///
/// ```
/// use tictactoe_td::q_learning::{AgentConfig, TdAgent};
/// use tictactoe_td::types::{Action, StateKey};
///
/// let mut agent = TdAgent::q_learning(AgentConfig::default().with_seed(7)).unwrap();
/// let state = StateKey::parse("XX-OO----").unwrap();
/// agent.update(&state, None, Action::new(0, 2), None, 1.0).unwrap();
/// assert_eq!(agent.q_table().lookup(&state, Action::new(0, 2)), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct TdAgent {
    algorithm: TdAlgorithm,
    q_table: QTable,
    config: AgentConfig,
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl TdAgent {
    /// Create a new agent
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the hyperparameters are
    /// out of range.
    pub fn new(algorithm: TdAlgorithm, config: AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            algorithm,
            q_table: QTable::new(config.learning_rate, config.discount_factor),
            epsilon: config.epsilon,
            rng: build_rng(config.seed),
            rng_seed: config.seed,
            config,
        })
    }

    pub fn q_learning(config: AgentConfig) -> Result<Self> {
        Self::new(TdAlgorithm::QLearning, config)
    }

    pub fn sarsa(config: AgentConfig) -> Result<Self> {
        Self::new(TdAlgorithm::Sarsa, config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    /// Re-seed the action-selection RNG.
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    /// ε-greedy action selection
    ///
    /// With probability ε returns a uniformly random legal action;
    /// otherwise the legal action with the highest Q-value, breaking ties
    /// uniformly at random among all maximal actions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] if `legal_actions` is empty.
    pub fn select_action(&mut self, state: &StateKey, legal_actions: &[Action]) -> Result<Action> {
        let no_actions = || Error::NoLegalActions {
            state: state.to_string(),
        };

        if self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            return legal_actions
                .choose(&mut self.rng)
                .copied()
                .ok_or_else(no_actions);
        }

        // Exploit: random choice among the maximal actions
        self.q_table
            .greedy_actions(state, legal_actions)
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(no_actions)
    }

    /// Apply the agent's TD rule to one transition.
    ///
    /// `next_state = None` marks a terminal transition; the bootstrap term is
    /// then zero for both algorithms. For SARSA, `next_action` must be the
    /// action that will actually be played in `next_state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingNextAction`] for a non-terminal SARSA update
    /// without a next action.
    pub fn update(
        &mut self,
        state: &StateKey,
        next_state: Option<&StateKey>,
        action: Action,
        next_action: Option<Action>,
        reward: f64,
    ) -> Result<()> {
        match self.algorithm {
            TdAlgorithm::QLearning => {
                self.q_table
                    .q_learning_update(state, action, reward, next_state);
            }
            TdAlgorithm::Sarsa => {
                let next = match (next_state, next_action) {
                    (None, _) => None,
                    (Some(next_state), Some(next_action)) => Some((next_state, next_action)),
                    (Some(next_state), None) => {
                        return Err(Error::MissingNextAction {
                            state: next_state.to_string(),
                        });
                    }
                };
                self.q_table.sarsa_update(state, action, reward, next);
            }
        }
        Ok(())
    }

    /// Decay epsilon after an episode; floored at the configured minimum.
    pub fn decay_exploration(&mut self) {
        self.epsilon = (self.epsilon - self.config.epsilon_decay)
            .max(self.config.min_epsilon)
            .min(self.epsilon);
    }

    pub fn algorithm(&self) -> TdAlgorithm {
        self.algorithm
    }

    pub fn name(&self) -> &str {
        self.algorithm.label()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }

    pub fn q_table_size(&self) -> usize {
        self.q_table.size()
    }

    pub(crate) fn export_state(&self) -> TdAgentState {
        TdAgentState {
            q_table: self.q_table.clone(),
            epsilon: self.epsilon,
            config: self.config.clone(),
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(algorithm: TdAlgorithm, state: TdAgentState) -> Result<Self> {
        state.config.validate()?;
        Ok(Self {
            algorithm,
            q_table: state.q_table,
            config: state.config,
            epsilon: state.epsilon,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::parse(s).unwrap()
    }

    fn greedy_config() -> AgentConfig {
        AgentConfig::default().with_epsilon(0.0).with_seed(3)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AgentConfig::default().with_learning_rate(2.0);
        assert!(matches!(
            TdAgent::q_learning(config),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_select_action_without_legal_actions_fails() {
        let mut agent = TdAgent::sarsa(greedy_config()).unwrap();
        let err = agent
            .select_action(&key("XOXOXOOXO"), &[])
            .unwrap_err();
        assert!(matches!(err, Error::NoLegalActions { .. }));
    }

    #[test]
    fn test_greedy_selection_picks_best_action() {
        let mut agent = TdAgent::q_learning(greedy_config()).unwrap();
        let state = key("---------");
        agent.q_table_mut().set(state.clone(), Action::new(2, 1), 0.4);
        let legal = state.empty_cells();
        for _ in 0..20 {
            assert_eq!(agent.select_action(&state, &legal).unwrap(), Action::new(2, 1));
        }
    }

    #[test]
    fn test_ties_are_broken_randomly() {
        let mut agent = TdAgent::q_learning(greedy_config()).unwrap();
        let state = key("---------");
        let legal = state.empty_cells();
        let picks: std::collections::HashSet<Action> = (0..200)
            .map(|_| agent.select_action(&state, &legal).unwrap())
            .collect();
        // All nine cells are tied at zero; more than one should be chosen
        assert!(picks.len() > 1);
    }

    #[test]
    fn test_exploration_stays_legal() {
        let config = AgentConfig::default().with_epsilon(1.0).with_seed(11);
        let mut agent = TdAgent::q_learning(config).unwrap();
        let state = key("XO-OX-X--");
        let legal = state.empty_cells();
        for _ in 0..50 {
            let action = agent.select_action(&state, &legal).unwrap();
            assert!(legal.contains(&action));
        }
    }

    #[test]
    fn test_sarsa_requires_next_action() {
        let mut agent = TdAgent::sarsa(greedy_config()).unwrap();
        let state = key("---------");
        let next = key("X---O----");
        let err = agent
            .update(&state, Some(&next), Action::new(0, 0), None, 0.0)
            .unwrap_err();
        assert!(matches!(err, Error::MissingNextAction { .. }));
    }

    #[test]
    fn test_decay_exploration_is_floored() {
        let config = AgentConfig::default()
            .with_epsilon(0.1)
            .with_epsilon_decay(0.04)
            .with_min_epsilon(0.05);
        let mut agent = TdAgent::q_learning(config).unwrap();

        agent.decay_exploration();
        assert!((agent.epsilon() - 0.06).abs() < 1e-12);
        agent.decay_exploration();
        assert_eq!(agent.epsilon(), 0.05);
        agent.decay_exploration();
        assert_eq!(agent.epsilon(), 0.05);
    }

    #[test]
    fn test_zero_decay_keeps_epsilon() {
        let mut agent = TdAgent::sarsa(AgentConfig::default()).unwrap();
        agent.decay_exploration();
        assert_eq!(agent.epsilon(), 0.1);
    }
}
