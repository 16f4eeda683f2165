//! Export functionality for analysis
//!
//! Currently supports CSV export of per-episode reward curves.

mod rewards_csv;

pub use rewards_csv::{RewardCurve, RewardRow};
