//! Hyperparameters for temporal difference agents.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for creating a [`TdAgent`](super::TdAgent).
///
/// # Examples
///
/// ```
/// use tictactoe_td::q_learning::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_learning_rate(0.3)
///     .with_epsilon(0.2)
///     .with_epsilon_decay(0.001)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate α, in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ, in [0, 1]
    pub discount_factor: f64,
    /// Initial exploration rate ε, in [0, 1]
    pub epsilon: f64,
    /// Amount subtracted from ε after every episode
    pub epsilon_decay: f64,
    /// Floor for ε
    pub min_epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.9,
            epsilon: 0.1,
            epsilon_decay: 0.0,
            min_epsilon: 0.0,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every hyperparameter against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);

        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0 && self.learning_rate <= 1.0)
        {
            return Err(Error::config(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !in_unit(self.discount_factor) {
            return Err(Error::config(format!(
                "discount factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if !in_unit(self.epsilon) {
            return Err(Error::config(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if !(self.epsilon_decay.is_finite() && self.epsilon_decay >= 0.0) {
            return Err(Error::config(format!(
                "epsilon decay must be a non-negative number, got {}",
                self.epsilon_decay
            )));
        }
        if !(in_unit(self.min_epsilon) && self.min_epsilon <= self.epsilon) {
            return Err(Error::config(format!(
                "minimum epsilon must be in [0, epsilon={}], got {}",
                self.epsilon, self.min_epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_hyperparameters() {
        let cases = [
            AgentConfig::default().with_learning_rate(0.0),
            AgentConfig::default().with_learning_rate(1.5),
            AgentConfig::default().with_discount_factor(-0.1),
            AgentConfig::default().with_epsilon(f64::NAN),
            AgentConfig::default().with_epsilon_decay(-0.001),
            AgentConfig::default().with_epsilon(0.1).with_min_epsilon(0.2),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfiguration { .. })),
                "expected {config:?} to be rejected"
            );
        }
    }
}
