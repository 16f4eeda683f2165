//! Export command - Write a saved agent's reward history as CSV
//!
//! The CSV holds `episode,reward,cumulative,smoothed` columns, ready for
//! plotting the learning curve with any external tool.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::MsgPackRepository,
    cli::output::{format_number, print_kv, print_section},
    export::RewardCurve,
    ports::AgentRepository,
};

#[derive(Parser, Debug)]
#[command(about = "Export a saved agent's reward history as CSV")]
pub struct ExportArgs {
    /// Saved agent file
    #[arg(long, short = 'p')]
    pub path: PathBuf,

    /// Output CSV file
    #[arg(long, short = 'o', default_value = "rewards.csv")]
    pub output: PathBuf,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let saved = MsgPackRepository::new()
        .load(&args.path)
        .with_context(|| format!("failed to load agent from {}", args.path.display()))?;

    let curve = RewardCurve::from_rewards(&saved.metadata.rewards)
        .with_context(|| format!("{} has no recorded training episodes", args.path.display()))?;
    curve
        .write_csv(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    print_section("Reward curve export");
    print_kv("Agent", &format!("{} ({})", args.path.display(), saved.algorithm.label()));
    print_kv("Episodes", &format_number(curve.len()));
    print_kv("Smoothing window", &format_number(curve.window()));
    print_kv(
        "Total reward",
        &format!("{:.0}", curve.cumulative().last().copied().unwrap_or_default()),
    );
    print_kv("Output", &args.output.display().to_string());
    Ok(())
}
