//! Tabular TD learning for N×N tic-tac-toe
//!
//! This CLI provides:
//! - Self-play training of two Q-learning or SARSA agents
//! - Training against a rule-based teacher
//! - Interactive play against a saved agent
//! - Export of reward curves for plotting

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "tictactoe-td")]
#[command(version, about = "Q-learning and SARSA agents for N×N tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train two agents against each other
    SelfPlay(tictactoe_td::cli::commands::self_play::SelfPlayArgs),

    /// Train an agent against the heuristic teacher
    Teach(tictactoe_td::cli::commands::teach::TeachArgs),

    /// Play against an agent on the terminal
    Play(tictactoe_td::cli::commands::play::PlayArgs),

    /// Export a saved agent's reward history as CSV
    ExportRewards(tictactoe_td::cli::commands::export::ExportArgs),
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tictactoe_td=info,warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::SelfPlay(args) => tictactoe_td::cli::commands::self_play::execute(args),
        Commands::Teach(args) => tictactoe_td::cli::commands::teach::execute(args),
        Commands::Play(args) => tictactoe_td::cli::commands::play::execute(args),
        Commands::ExportRewards(args) => tictactoe_td::cli::commands::export::execute(args),
    }
}
