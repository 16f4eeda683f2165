//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, StateKey};

/// Value reported for a `(state, action)` pair that was never updated.
pub const DEFAULT_VALUE: f64 = 0.0;

/// Q-table mapping (state, action) pairs to Q-values
///
/// Entries are created only by [`QTable::set`] and the update rules.
/// Reading never inserts: [`QTable::lookup`] returns [`DEFAULT_VALUE`] for
/// pairs that are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    /// Q-values: state -> action -> Q-value
    q_values: HashMap<StateKey, HashMap<Action, f64>>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    /// Get Q-value for a state-action pair, [`DEFAULT_VALUE`] if absent
    pub fn lookup(&self, state: &StateKey, action: Action) -> f64 {
        self.get(state, action).unwrap_or(DEFAULT_VALUE)
    }

    /// Get the stored Q-value, `None` if the pair was never recorded
    pub fn get(&self, state: &StateKey, action: Action) -> Option<f64> {
        self.q_values
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.q_values.entry(state).or_default().insert(action, value);
    }

    /// Maximum Q-value available from `state`
    ///
    /// Runs over every action recorded for the state, plus the zero default
    /// when some empty cell of the state has no record yet. A state with
    /// neither yields [`DEFAULT_VALUE`].
    pub fn max_value(&self, state: &StateKey) -> f64 {
        let recorded = self.q_values.get(state);
        let has_unrecorded = state
            .empty_cells()
            .iter()
            .any(|action| recorded.is_none_or(|actions| !actions.contains_key(action)));

        let best_recorded = recorded
            .into_iter()
            .flat_map(|actions| actions.values().copied())
            .reduce(f64::max);

        match (best_recorded, has_unrecorded) {
            (Some(best), true) => best.max(DEFAULT_VALUE),
            (Some(best), false) => best,
            (None, _) => DEFAULT_VALUE,
        }
    }

    /// All legal actions sharing the highest Q-value in `state`
    pub fn greedy_actions(&self, state: &StateKey, legal_actions: &[Action]) -> Vec<Action> {
        let best = legal_actions
            .iter()
            .map(|&action| self.lookup(state, action))
            .fold(f64::NEG_INFINITY, f64::max);

        legal_actions
            .iter()
            .copied()
            .filter(|&action| self.lookup(state, action) == best)
            .collect()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// A `None` next state is terminal and bootstraps from zero.
    pub fn q_learning_update(
        &mut self,
        state: &StateKey,
        action: Action,
        reward: f64,
        next_state: Option<&StateKey>,
    ) {
        let max_next_q = next_state.map_or(0.0, |next| self.max_value(next));
        self.apply_td(state, action, reward, max_next_q);
    }

    /// SARSA update: on-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
    ///
    /// `next` is the successor state together with the action actually
    /// taken there; `None` is terminal.
    pub fn sarsa_update(
        &mut self,
        state: &StateKey,
        action: Action,
        reward: f64,
        next: Option<(&StateKey, Action)>,
    ) {
        let next_q = next.map_or(0.0, |(next_state, next_action)| {
            self.lookup(next_state, next_action)
        });
        self.apply_td(state, action, reward, next_q);
    }

    fn apply_td(&mut self, state: &StateKey, action: Action, reward: f64, bootstrap: f64) {
        let current_q = self.lookup(state, action);
        let td_target = reward + self.discount_factor * bootstrap;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(state.clone(), action, new_q);
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.values().map(HashMap::len).sum()
    }

    /// Number of distinct states with at least one recorded action
    pub fn state_count(&self) -> usize {
        self.q_values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::parse(s).unwrap()
    }

    #[test]
    fn test_unseen_pair_defaults_to_zero() {
        let qtable = QTable::new(0.5, 0.9);
        assert_eq!(qtable.lookup(&key("---------"), Action::new(0, 0)), 0.0);
        assert_eq!(qtable.get(&key("---------"), Action::new(0, 0)), None);
        assert_eq!(qtable.size(), 0);
    }

    #[test]
    fn test_qtable_set_lookup() {
        let mut qtable = QTable::new(0.5, 0.9);
        let state = key("---------");
        qtable.set(state.clone(), Action::new(1, 1), 1.5);
        assert_eq!(qtable.lookup(&state, Action::new(1, 1)), 1.5);
        assert_eq!(qtable.size(), 1);
        assert_eq!(qtable.state_count(), 1);
    }

    #[test]
    fn test_max_value_includes_unrecorded_default() {
        let mut qtable = QTable::new(0.5, 0.9);
        let state = key("XO-------");
        qtable.set(state.clone(), Action::new(0, 2), -0.4);
        // Other empty cells are still worth the default 0
        assert_eq!(qtable.max_value(&state), 0.0);

        qtable.set(state.clone(), Action::new(1, 0), 0.7);
        assert_eq!(qtable.max_value(&state), 0.7);
    }

    #[test]
    fn test_max_value_all_recorded_negative() {
        let mut qtable = QTable::new(0.5, 0.9);
        let state = key("XOXOXO-OX");
        qtable.set(state.clone(), Action::new(2, 0), -0.25);
        assert_eq!(qtable.max_value(&state), -0.25);
    }

    #[test]
    fn test_greedy_actions_returns_all_ties() {
        let mut qtable = QTable::new(0.5, 0.9);
        let state = key("---------");
        let legal = state.empty_cells();
        qtable.set(state.clone(), Action::new(0, 0), 0.8);
        qtable.set(state.clone(), Action::new(2, 2), 0.8);
        qtable.set(state.clone(), Action::new(1, 1), 0.3);

        let greedy = qtable.greedy_actions(&state, &legal);
        assert_eq!(greedy, vec![Action::new(0, 0), Action::new(2, 2)]);
    }

    #[test]
    fn test_q_learning_terminal_update() {
        let mut qtable = QTable::new(0.5, 0.9);
        let state = key("XX-OO----");
        qtable.q_learning_update(&state, Action::new(0, 2), 1.0, None);
        assert_eq!(qtable.lookup(&state, Action::new(0, 2)), 0.5);
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new(0.5, 0.9);
        let state = key("---------");
        let next_state = key("----X---O");

        qtable.set(next_state.clone(), Action::new(0, 0), 1.0);
        qtable.set(next_state.clone(), Action::new(0, 1), 2.0);

        qtable.q_learning_update(&state, Action::new(1, 1), 0.0, Some(&next_state));

        // Q(s,a) = 0.0 + 0.5 * (0.0 + 0.9 * 2.0 - 0.0) = 0.9
        let updated_q = qtable.lookup(&state, Action::new(1, 1));
        assert!((updated_q - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_sarsa_update() {
        let mut qtable = QTable::new(0.5, 0.9);
        let state = key("---------");
        let next_state = key("----X---O");

        qtable.set(next_state.clone(), Action::new(0, 0), 1.5);
        qtable.set(next_state.clone(), Action::new(0, 1), 3.0);

        qtable.sarsa_update(
            &state,
            Action::new(1, 1),
            0.0,
            Some((&next_state, Action::new(0, 0))),
        );

        // Q(s,a) = 0.0 + 0.5 * (0.0 + 0.9 * 1.5 - 0.0) = 0.675
        let updated_q = qtable.lookup(&state, Action::new(1, 1));
        assert!((updated_q - 0.675).abs() < 1e-12);
    }
}
