//! Training pipeline abstractions
//!
//! This module provides:
//! - The episode orchestrator that runs one game and feeds the learners
//! - The training loop over many episodes, with checkpoints
//! - Observers recording what happens during training

pub mod episode;
pub mod observers;
pub mod training;

pub use episode::{EpisodeReport, EpisodeRunner, Participant};
// Re-export observer implementations (adapters)
pub use observers::{
    EpisodeRecord, JsonlObserver, ProgressObserver, TracingObserver,
};
pub use training::{CheckpointFn, FirstMover, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Observer, Policy};
