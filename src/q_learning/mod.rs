//! Q-learning and SARSA temporal difference learning
//!
//! Tabular TD control for tic-tac-toe. Each agent owns one [`QTable`]
//! keyed by board [`StateKey`](crate::types::StateKey) and
//! [`Action`](crate::types::Action), chooses moves ε-greedily and updates
//! after every transition it is handed.
//!
//! ## Algorithms
//!
//! - **Q-learning**: Off-policy TD control that learns optimal Q* values
//! - **SARSA**: On-policy TD control that learns Q^π for the followed policy
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy (learns Q*) | On-policy (learns Q^π) |
//! | Update | Uses max_a Q(s',a') | Uses actual Q(s',a') |
//! | Exploration | Can be reckless | More conservative |
//!
//! ## Usage Example
//!
//! ```
//! use tictactoe_td::q_learning::{AgentConfig, TdAgent};
//!
//! let config = AgentConfig::default()
//!     .with_learning_rate(0.5)
//!     .with_discount_factor(0.9)
//!     .with_epsilon(0.1)
//!     .with_epsilon_decay(0.001);
//!
//! let q_agent = TdAgent::q_learning(config.clone()).unwrap();
//! let sarsa_agent = TdAgent::sarsa(config).unwrap();
//! assert_eq!(q_agent.name(), "Q-Learning");
//! assert_eq!(sarsa_agent.name(), "SARSA");
//! ```

pub mod agent;
pub mod config;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{TdAgent, TdAlgorithm};
pub use config::AgentConfig;
pub use q_table::QTable;
pub use serialization::{SavedAgent, TrainingMetadata};
