//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling training
//! logic to specific output formats or metrics.

use crate::{Result, pipeline::EpisodeReport, tictactoe::Move};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_move(...)` - For each move in the episode
///    - `on_episode_end(episode, report)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```
/// use tictactoe_td::{pipeline::EpisodeReport, ports::Observer};
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _report: &EpisodeReport,
///     ) -> tictactoe_td::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (`episode` is 0-based).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each move has been applied to the board.
    ///
    /// `step` counts placements within the episode, starting at 0.
    fn on_move(&mut self, _episode: usize, _step: usize, _mv: &Move) -> Result<()> {
        Ok(())
    }

    /// Called when an episode reaches a terminal position, after the
    /// terminal updates were applied.
    fn on_episode_end(&mut self, _episode: usize, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    ///
    /// Use this to finalize outputs or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
