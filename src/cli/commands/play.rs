//! Play command - Human vs agent on the terminal
//!
//! The agent keeps learning while it plays and is saved after every
//! finished game.

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    Error,
    adapters::MsgPackRepository,
    cli::config::{HyperparameterArgs, default_agent_path},
    opponents::HumanPlayer,
    pipeline::{EpisodeRunner, Participant},
    ports::AgentRepository,
    q_learning::{SavedAgent, TdAgent, TrainingMetadata},
    tictactoe::Player,
};

#[derive(Parser, Debug)]
#[command(about = "Play against an agent on the terminal")]
pub struct PlayArgs {
    #[command(flatten)]
    pub hyperparameters: HyperparameterArgs,

    /// Agent file; loaded if it exists, created otherwise
    /// (default: <algorithm>_agent_<n>x<n>.msgpack)
    #[arg(long, short = 'p')]
    pub path: Option<PathBuf>,

    /// Board side length
    #[arg(long, short = 'b', default_value_t = 4)]
    pub board_size: usize,

    /// Random seed for the agent
    #[arg(long)]
    pub seed: Option<u64>,
}

/// What happened in an interactive session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub games_played: usize,
    pub human_wins: usize,
    pub agent_wins: usize,
    pub draws: usize,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut human = HumanPlayer::new(stdin.lock(), io::stdout());
    play_session(&args, &mut human)?;
    Ok(())
}

fn load_or_create(args: &PlayArgs, path: &Path) -> Result<(TdAgent, TrainingMetadata)> {
    let algorithm = args.hyperparameters.algorithm();
    if path.exists() {
        let saved = MsgPackRepository::new()
            .load(path)
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
        Ok((saved.to_agent()?, saved.metadata))
    } else {
        let config = args.hyperparameters.agent_config(0.001, args.seed);
        let agent = TdAgent::new(algorithm, config).context("invalid hyperparameters")?;
        Ok((agent, TrainingMetadata::new("human", args.board_size)))
    }
}

/// Run games until the human declines another one or input ends.
///
/// The human plays X and the agent O.
pub fn play_session<R: BufRead, W: Write>(
    args: &PlayArgs,
    human: &mut HumanPlayer<R, W>,
) -> Result<SessionSummary> {
    let path = args
        .path
        .clone()
        .unwrap_or_else(|| default_agent_path(args.hyperparameters.algorithm(), args.board_size));
    let (mut agent, mut metadata) = load_or_create(args, &path)?;
    let mut runner = EpisodeRunner::new(args.board_size)?;
    let repo = MsgPackRepository::new();
    let mut summary = SessionSummary::default();

    let n = args.board_size;
    human.say(format!("Welcome to {n}x{n} Tic-Tac-Toe."))?;
    human.say("You are 'X' and the computer is 'O'.")?;

    loop {
        let first_player = match human.confirm("Would you like to go first?") {
            Ok(true) => Player::X,
            Ok(false) => Player::O,
            Err(Error::InputClosed) => break,
            Err(err) => return Err(err.into()),
        };

        let report = match runner.run(
            Participant::Policy(&mut *human),
            Participant::Learner(&mut agent),
            first_player,
        ) {
            Ok(report) => report,
            Err(Error::InputClosed) => break,
            Err(err) => return Err(err.into()),
        };

        human.say(runner.board())?;
        match report.winner() {
            Some(Player::X) => {
                summary.human_wins += 1;
                human.say("Player wins!")?;
            }
            Some(Player::O) => {
                summary.agent_wins += 1;
                human.say("RL agent wins!")?;
            }
            None => {
                summary.draws += 1;
                human.say("It's a draw!")?;
            }
        }

        agent.decay_exploration();
        metadata.record_run(&[report.reward_for(Player::O)]);
        repo.save(&SavedAgent::from_agent(&agent, metadata.clone()), &path)
            .with_context(|| format!("failed to save agent to {}", path.display()))?;

        summary.games_played += 1;
        human.say(format!("Games played: {}", summary.games_played))?;

        match human.confirm("Do you want to play again?") {
            Ok(true) => {}
            Ok(false) | Err(Error::InputClosed) => break,
            Err(err) => return Err(err.into()),
        }
    }

    human.say("OK. Quitting.")?;
    Ok(summary)
}
