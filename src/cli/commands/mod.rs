//! Subcommand implementations
//!
//! Each command is an argument struct plus an `execute` function.

pub mod export;
pub mod play;
pub mod self_play;
pub mod teach;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    pipeline::{JsonlObserver, ProgressObserver, TracingObserver, TrainingPipeline, TrainingResult},
    tictactoe::Player,
};

/// Attach the observers requested on the command line.
pub(crate) fn attach_observers(
    mut pipeline: TrainingPipeline,
    progress: bool,
    log_every: usize,
    episode_log: Option<&Path>,
    perspective: Player,
) -> Result<TrainingPipeline> {
    pipeline = pipeline.with_observer(Box::new(TracingObserver::new(log_every)));
    if progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new(perspective)));
    }
    if let Some(path) = episode_log {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create episode log {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }
    Ok(pipeline)
}

/// Write the training summary JSON if `--summary` was given.
pub(crate) fn write_summary(result: &TrainingResult, path: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = path {
        result
            .save(path)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        println!("  Summary written to {}", path.display());
    }
    Ok(())
}
