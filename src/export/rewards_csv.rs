//! CSV export of training reward curves
//!
//! Each row carries the episode's terminal reward, the running total and a
//! moving average over `max(1, len / 100)` episodes. The moving average is
//! only reported where a full window ends, so the first `window - 1` rows
//! leave it empty.

use std::path::Path;

use serde::Serialize;

use crate::{Error, Result};

/// Reward history with its cumulative and smoothed series
#[derive(Debug, Clone, PartialEq)]
pub struct RewardCurve {
    rewards: Vec<f64>,
    cumulative: Vec<f64>,
    smoothed: Vec<f64>,
    window: usize,
}

/// One CSV row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardRow {
    pub episode: usize,
    pub reward: f64,
    pub cumulative: f64,
    pub smoothed: Option<f64>,
}

impl RewardCurve {
    /// Build the curve from one terminal reward per episode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an empty history.
    ///
    /// # Examples
    ///
    /// ```
    /// use tictactoe_td::export::RewardCurve;
    ///
    /// let curve = RewardCurve::from_rewards(&[1.0, -1.0, 0.0, 1.0]).unwrap();
    /// assert_eq!(curve.cumulative(), &[1.0, 0.0, 0.0, 1.0]);
    /// assert_eq!(curve.window(), 1);
    /// ```
    pub fn from_rewards(rewards: &[f64]) -> Result<Self> {
        if rewards.is_empty() {
            return Err(Error::config("reward history is empty"));
        }

        let cumulative = rewards
            .iter()
            .scan(0.0, |total, &r| {
                *total += r;
                Some(*total)
            })
            .collect();

        let window = (rewards.len() / 100).max(1);
        let smoothed = rewards
            .windows(window)
            .map(|w| w.iter().sum::<f64>() / window as f64)
            .collect();

        Ok(Self {
            rewards: rewards.to_vec(),
            cumulative,
            smoothed,
            window,
        })
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Moving average over full windows (`len - window + 1` points).
    pub fn smoothed(&self) -> &[f64] {
        &self.smoothed
    }

    /// Rows with 1-based episode numbers.
    pub fn rows(&self) -> impl Iterator<Item = RewardRow> + '_ {
        self.rewards.iter().enumerate().map(|(i, &reward)| RewardRow {
            episode: i + 1,
            reward,
            cumulative: self.cumulative[i],
            smoothed: (i + 1)
                .checked_sub(self.window)
                .map(|start| self.smoothed[start]),
        })
    }

    /// Write `episode,reward,cumulative,smoothed` rows to `path`.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in self.rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
