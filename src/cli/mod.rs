//! CLI infrastructure for training and playing TD agents
//!
//! This module provides the command-line interface for self-play training,
//! training against the heuristic teacher, interactive play and reward
//! export.

pub mod commands;
pub mod config;
pub mod output;
