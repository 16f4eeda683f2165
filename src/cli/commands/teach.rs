//! Teach command - Train an agent against the heuristic teacher

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use super::{attach_observers, write_summary};
use crate::{
    adapters::MsgPackRepository,
    cli::{
        config::{HyperparameterArgs, default_agent_path},
        output::{format_number, format_percent, print_kv, print_section, print_training_result},
    },
    opponents::{HeuristicTeacher, heuristic::DEFAULT_LEVEL},
    pipeline::{FirstMover, TrainingConfig, TrainingPipeline},
    ports::{AgentRepository, Policy},
    q_learning::{SavedAgent, TdAgent, TrainingMetadata},
    tictactoe::Player,
};

#[derive(Parser, Debug)]
#[command(about = "Train an agent against the heuristic teacher")]
pub struct TeachArgs {
    /// Number of training episodes
    #[arg(long, short = 't', default_value_t = 10000)]
    pub episodes: usize,

    #[command(flatten)]
    pub hyperparameters: HyperparameterArgs,

    /// Where the agent is stored
    /// (default: <algorithm>_agent_<n>x<n>.msgpack)
    #[arg(long, short = 'p')]
    pub path: Option<PathBuf>,

    /// Continue training the agent saved at --path
    #[arg(long, short = 'l', default_value_t = false)]
    pub load: bool,

    /// Overwrite an existing agent at --path
    #[arg(long, default_value_t = false, conflicts_with = "load")]
    pub force: bool,

    /// Board side length
    #[arg(long, short = 'b', default_value_t = 4)]
    pub board_size: usize,

    /// Probability that the teacher follows its rules instead of playing randomly
    #[arg(long, default_value_t = DEFAULT_LEVEL)]
    pub teacher_level: f64,

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

pub fn execute(args: TeachArgs) -> Result<()> {
    if args.episodes == 0 {
        bail!("--episodes must be positive");
    }

    let algorithm = args.hyperparameters.algorithm();
    let path = args
        .path
        .clone()
        .unwrap_or_else(|| default_agent_path(algorithm, args.board_size));
    let repo = MsgPackRepository::new();

    let (mut agent, mut metadata) = if args.load {
        let saved = repo
            .load(&path)
            .with_context(|| format!("failed to load agent from {}", path.display()))?;
        if saved.algorithm != algorithm {
            bail!(
                "{} holds a {} agent, not {}",
                path.display(),
                saved.algorithm.label(),
                algorithm.label()
            );
        }
        if saved.metadata.board_size != args.board_size {
            bail!(
                "{} was trained on a {n}x{n} board; pass --board-size {n}",
                path.display(),
                n = saved.metadata.board_size
            );
        }
        (saved.to_agent()?, saved.metadata)
    } else {
        if path.exists() && !args.force {
            bail!(
                "An agent is already saved at {}. Pass --load to continue training it or --force to overwrite it.",
                path.display()
            );
        }
        let config = args.hyperparameters.agent_config(0.001, args.seed);
        let agent = TdAgent::new(algorithm, config).context("invalid hyperparameters")?;
        (agent, TrainingMetadata::new("", args.board_size))
    };

    let mut teacher = HeuristicTeacher::new(args.teacher_level)?;
    let config = TrainingConfig {
        episodes: args.episodes,
        board_size: args.board_size,
        seed: args.seed,
        agent_player: Player::O,
        first_mover: FirstMover::Random,
    };
    let mut pipeline = attach_observers(
        TrainingPipeline::new(config),
        args.progress,
        args.log_every,
        args.episode_log.as_deref(),
        Player::O,
    )?;

    print_section(&format!(
        "Teaching {} agent on {n}x{n}",
        agent.name(),
        n = args.board_size
    ));
    print_kv("Agent file", &path.display().to_string());
    print_kv("Teacher level", &format_percent(teacher.level()));
    if args.load {
        print_kv(
            "Previously trained",
            &format!("{} episodes", format_number(metadata.episodes_trained)),
        );
    }

    let result = pipeline
        .run_against(&mut agent, &mut teacher)
        .context("training against the teacher failed")?;

    metadata.opponent = teacher.name().to_string();
    metadata.seed = args.seed;
    metadata.record_run(&result.rewards);
    repo.save(&SavedAgent::from_agent(&agent, metadata), &path)
        .with_context(|| format!("failed to save agent to {}", path.display()))?;

    println!("\nResults for the agent (O):");
    print_training_result(&result);
    print_kv("Q-values", &format_number(agent.q_table_size()));
    print_kv("Final epsilon", &format!("{:.4}", agent.epsilon()));
    print_kv("Saved to", &path.display().to_string());
    write_summary(&result, args.summary.as_ref())?;
    Ok(())
}
