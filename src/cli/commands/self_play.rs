//! Self-play command - Train two agents against each other

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use super::{attach_observers, write_summary};
use crate::{
    adapters::MsgPackRepository,
    cli::{
        config::{HyperparameterArgs, checkpoint_path},
        output::{format_number, print_kv, print_section, print_training_result},
    },
    export::RewardCurve,
    pipeline::{FirstMover, TrainingConfig, TrainingPipeline},
    ports::AgentRepository,
    q_learning::{SavedAgent, TdAgent, TrainingMetadata},
    tictactoe::Player,
};

/// Opponent label stored in self-play metadata.
pub const SELF_PLAY_OPPONENT: &str = "self-play";

#[derive(Parser, Debug)]
#[command(about = "Train two agents by playing against each other")]
pub struct SelfPlayArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 20000)]
    pub episodes: usize,

    #[command(flatten)]
    pub hyperparameters: HyperparameterArgs,

    /// Board side length
    #[arg(long, short = 'b', default_value_t = 3)]
    pub board_size: usize,

    /// Directory for checkpoints, final agents and the reward curve
    #[arg(long, default_value = "agents")]
    pub save_dir: PathBuf,

    /// Save both agents every N episodes (0 disables checkpoints)
    #[arg(long, default_value_t = 5000)]
    pub save_every: usize,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON training summary to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Write one JSON line per episode to this file
    #[arg(long)]
    pub episode_log: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Log a progress line every N episodes
    #[arg(long, default_value_t = 1000)]
    pub log_every: usize,
}

pub fn execute(args: SelfPlayArgs) -> Result<()> {
    if args.episodes == 0 {
        bail!("--episodes must be positive");
    }

    let algorithm = args.hyperparameters.algorithm();
    let agent_config = args.hyperparameters.agent_config(0.0, args.seed);
    let mut agent1 =
        TdAgent::new(algorithm, agent_config.clone()).context("invalid hyperparameters")?;
    let mut agent2 = TdAgent::new(algorithm, agent_config)?;

    // Agent 1 plays O and always opens
    let config = TrainingConfig {
        episodes: args.episodes,
        board_size: args.board_size,
        seed: args.seed,
        agent_player: Player::O,
        first_mover: FirstMover::Agent,
    };

    let repo = MsgPackRepository::new();
    let save_dir = args.save_dir.clone();
    let board_size = args.board_size;
    let seed = args.seed;

    let pipeline = TrainingPipeline::new(config).with_checkpoint(
        args.save_every,
        Box::new(move |episodes, agents, rewards| {
            let mirrored: Vec<f64> = rewards.iter().map(|r| -r).collect();
            for (slot, agent) in agents.iter().enumerate() {
                let mut metadata = TrainingMetadata::new(SELF_PLAY_OPPONENT, board_size);
                metadata.seed = seed;
                metadata.record_run(if slot == 0 { rewards } else { &mirrored });
                let path = checkpoint_path(
                    &save_dir,
                    slot + 1,
                    agent.algorithm(),
                    &episodes.to_string(),
                );
                repo.save(&SavedAgent::from_agent(agent, metadata), &path)?;
            }
            info!(episodes, dir = %save_dir.display(), "checkpoint saved");
            Ok(())
        }),
    );
    let mut pipeline = attach_observers(
        pipeline,
        args.progress,
        args.log_every,
        args.episode_log.as_deref(),
        Player::O,
    )?;

    print_section(&format!(
        "Self-play: {} vs {} on {n}x{n}",
        agent1.name(),
        agent2.name(),
        n = args.board_size
    ));

    let result = pipeline
        .run_self_play(&mut agent1, &mut agent2)
        .context("self-play training failed")?;

    // Agent 2 sees every result with the opposite sign
    let agent2_rewards: Vec<f64> = result.rewards.iter().map(|r| -r).collect();
    for (slot, agent, rewards) in [
        (1, &agent1, result.rewards.as_slice()),
        (2, &agent2, agent2_rewards.as_slice()),
    ] {
        let mut metadata = TrainingMetadata::new(SELF_PLAY_OPPONENT, args.board_size);
        metadata.seed = args.seed;
        metadata.record_run(rewards);
        let path = checkpoint_path(&args.save_dir, slot, algorithm, "final");
        repo.save(&SavedAgent::from_agent(agent, metadata), &path)
            .with_context(|| format!("failed to save {}", path.display()))?;
        print_kv(&format!("Agent {slot} saved"), &path.display().to_string());
    }

    let curve_path = args
        .save_dir
        .join(format!("rewards_{}.csv", algorithm.tag()));
    RewardCurve::from_rewards(&result.rewards)?
        .write_csv(&curve_path)
        .with_context(|| format!("failed to write {}", curve_path.display()))?;
    print_kv("Reward curve", &curve_path.display().to_string());

    println!("\nResults for agent 1 (O, moves first):");
    print_training_result(&result);
    print_kv("Agent 1 Q-values", &format_number(agent1.q_table_size()));
    print_kv("Agent 2 Q-values", &format_number(agent2.q_table_size()));
    write_summary(&result, args.summary.as_ref())?;

    println!("\nSelf-play training complete!");
    Ok(())
}
