//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::episode::EpisodeReport;
use crate::{
    Result,
    ports::Observer,
    tictactoe::{Outcome, Player},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    perspective: Player,
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a progress observer counting results for `perspective`
    pub fn new(perspective: Player) -> Self {
        Self {
            perspective,
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("W:{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        match report.outcome.outcome_for(self.perspective) {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw | Outcome::InProgress => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Logs progress through `tracing`
///
/// Emits an `info` event every `interval` episodes and a `debug` event for
/// each episode outcome.
pub struct TracingObserver {
    interval: usize,
}

impl TracingObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Observer for TracingObserver {
    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        debug!(
            episode,
            winner = ?report.winner(),
            moves = report.len(),
            final_state = %report.final_state,
            "episode outcome"
        );
        let played = episode + 1;
        if played % self.interval == 0 {
            info!(episodes = played, "episodes played");
        }
        Ok(())
    }
}

/// One line of the episode log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub first_player: Player,
    /// `"x"`, `"o"` or `"draw"`
    pub result: String,
    /// Placements as `(row, col)` pairs in order
    pub moves: Vec<(usize, usize)>,
    pub final_state: String,
}

/// JSONL observer - Exports one record per episode in JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        let record = EpisodeRecord {
            episode,
            first_player: report.first_player,
            result: match report.winner() {
                Some(Player::X) => "x".to_string(),
                Some(Player::O) => "o".to_string(),
                None => "draw".to_string(),
            },
            moves: report
                .moves
                .iter()
                .map(|mv| (mv.action.row, mv.action.col))
                .collect(),
            final_state: report.final_state.to_string(),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
