//! Non-learning participants
//!
//! Everything an agent can be trained or evaluated against: the rule-based
//! [`HeuristicTeacher`], an interactive [`HumanPlayer`] and the
//! [`RandomPolicy`] baseline. All of them implement
//! [`Policy`](crate::ports::Policy).

pub mod heuristic;
pub mod human;
pub mod random;

pub use heuristic::HeuristicTeacher;
pub use human::HumanPlayer;
pub use random::RandomPolicy;
