//! Training pipeline for TD agents

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::episode::{EpisodeRunner, Participant};
use crate::{
    Result,
    ports::{Observer, Policy},
    q_learning::TdAgent,
    tictactoe::Player,
};

/// Who opens each training episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstMover {
    /// The trained agent always moves first
    Agent,
    /// The opponent always moves first
    Opponent,
    /// Coin flip per episode
    Random,
}

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Side length of the board
    pub board_size: usize,

    /// Random seed
    pub seed: Option<u64>,

    /// Whether the agent plays as X or O
    pub agent_player: Player,

    /// Which side opens each episode
    pub first_mover: FirstMover,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            board_size: 3,
            seed: None,
            agent_player: Player::O,
            first_mover: FirstMover::Random,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    /// Number of wins
    pub wins: usize,

    /// Number of draws
    pub draws: usize,

    /// Number of losses
    pub losses: usize,

    /// Win rate
    pub win_rate: f64,

    /// Draw rate
    pub draw_rate: f64,

    /// Loss rate
    pub loss_rate: f64,

    /// Terminal reward of every episode, in order
    #[serde(default)]
    pub rewards: Vec<f64>,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(total_episodes: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if total_episodes > 0 {
                count as f64 / total_episodes as f64
            } else {
                0.0
            }
        };

        Self {
            total_episodes,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
            rewards: Vec::new(),
        }
    }

    /// Build a result from a reward history (+1 win, -1 loss, 0 draw).
    pub fn from_rewards(rewards: Vec<f64>) -> Self {
        let wins = rewards.iter().filter(|&&r| r > 0.0).count();
        let losses = rewards.iter().filter(|&&r| r < 0.0).count();
        let draws = rewards.len() - wins - losses;
        Self {
            rewards,
            ..Self::new(wins + draws + losses, wins, draws, losses)
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Callback receiving the number of finished episodes, the learners and the
/// rewards so far from the first learner's side.
pub type CheckpointFn = Box<dyn FnMut(usize, &[&TdAgent], &[f64]) -> Result<()>>;

struct Checkpoint {
    every: usize,
    callback: CheckpointFn,
}

/// Training pipeline for a learning agent against a policy or another agent
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    checkpoint: Option<Checkpoint>,
    rng: StdRng,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(2)),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            config,
            observers: Vec::new(),
            checkpoint: None,
            rng,
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Call `callback` after every `every` finished episodes. Zero disables
    /// checkpoints.
    pub fn with_checkpoint(mut self, every: usize, callback: CheckpointFn) -> Self {
        self.checkpoint = (every > 0).then_some(Checkpoint { every, callback });
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `agent` against a fixed policy.
    pub fn run_against(
        &mut self,
        agent: &mut TdAgent,
        opponent: &mut dyn Policy,
    ) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            opponent.set_rng_seed(seed.wrapping_add(1));
        }
        self.run(agent, Participant::Policy(opponent))
    }

    /// Train two agents against each other. Each keeps its own table;
    /// results are reported from `agent`'s side.
    pub fn run_self_play(
        &mut self,
        agent: &mut TdAgent,
        other: &mut TdAgent,
    ) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            other.set_rng_seed(seed.wrapping_add(1));
        }
        self.run(agent, Participant::Learner(other))
    }

    fn run(&mut self, agent: &mut TdAgent, mut opponent: Participant<'_>) -> Result<TrainingResult> {
        if let Some(seed) = self.config.seed {
            agent.set_rng_seed(seed);
        }

        let mut runner = EpisodeRunner::new(self.config.board_size)?;
        let agent_player = self.config.agent_player;
        let mut rewards = Vec::with_capacity(self.config.episodes);

        info!(
            episodes = self.config.episodes,
            board_size = self.config.board_size,
            agent = agent.name(),
            opponent = opponent.name(),
            "training started"
        );

        // Notify observers of training start
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        for episode in 0..self.config.episodes {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let first_player = self.first_player();
            let (x, o) = match agent_player {
                Player::X => (Participant::Learner(&mut *agent), opponent.reborrow()),
                Player::O => (opponent.reborrow(), Participant::Learner(&mut *agent)),
            };

            let observers = &mut self.observers;
            let report = runner.run_with(x, o, first_player, |step, mv| {
                for observer in observers.iter_mut() {
                    observer.on_move(episode, step, mv)?;
                }
                Ok(())
            })?;

            agent.decay_exploration();
            if let Participant::Learner(other) = &mut opponent {
                other.decay_exploration();
            }

            let reward = report.reward_for(agent_player);
            rewards.push(reward);
            debug!(
                episode,
                outcome = ?report.outcome,
                moves = report.len(),
                epsilon = agent.epsilon(),
                "episode finished"
            );

            // Notify observers of episode end
            for observer in &mut self.observers {
                observer.on_episode_end(episode, &report)?;
            }

            if let Some(checkpoint) = &mut self.checkpoint
                && (episode + 1) % checkpoint.every == 0
            {
                let mut agents = vec![&*agent];
                agents.extend(opponent.as_learner());
                (checkpoint.callback)(episode + 1, &agents, &rewards)?;
            }
        }

        // Notify observers of training end
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::from_rewards(rewards);
        info!(
            wins = result.wins,
            draws = result.draws,
            losses = result.losses,
            states = agent.q_table().state_count(),
            "training finished"
        );
        Ok(result)
    }

    fn first_player(&mut self) -> Player {
        let agent_player = self.config.agent_player;
        match self.config.first_mover {
            FirstMover::Agent => agent_player,
            FirstMover::Opponent => agent_player.opponent(),
            FirstMover::Random => {
                if self.rng.random_bool(0.5) {
                    agent_player
                } else {
                    agent_player.opponent()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{opponents::RandomPolicy, q_learning::AgentConfig};

    fn config(episodes: usize) -> TrainingConfig {
        TrainingConfig {
            episodes,
            seed: Some(42),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_training_pipeline() {
        let mut pipeline = TrainingPipeline::new(config(10));
        let mut agent = TdAgent::q_learning(AgentConfig::default()).unwrap();
        let mut opponent = RandomPolicy::new();

        let result = pipeline.run_against(&mut agent, &mut opponent).unwrap();

        assert_eq!(result.total_episodes, 10);
        assert_eq!(result.wins + result.draws + result.losses, 10);
        assert_eq!(result.rewards.len(), 10);
        assert!(agent.q_table_size() > 0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut pipeline = TrainingPipeline::new(config(50));
            let mut agent = TdAgent::sarsa(AgentConfig::default()).unwrap();
            let mut opponent = RandomPolicy::new();
            let result = pipeline.run_against(&mut agent, &mut opponent).unwrap();
            (result.rewards, agent.q_table().clone())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_epsilon_decays_once_per_episode() {
        let mut pipeline = TrainingPipeline::new(config(5));
        let agent_config = AgentConfig::default()
            .with_epsilon(0.5)
            .with_epsilon_decay(0.05);
        let mut agent = TdAgent::q_learning(agent_config.clone()).unwrap();
        let mut other = TdAgent::q_learning(agent_config).unwrap();

        pipeline.run_self_play(&mut agent, &mut other).unwrap();

        assert!((agent.epsilon() - 0.25).abs() < 1e-12);
        assert!((other.epsilon() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_checkpoints_fire_on_schedule() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&calls);
        let mut pipeline = TrainingPipeline::new(config(7)).with_checkpoint(
            3,
            Box::new(move |episodes, agents, rewards: &[f64]| {
                assert_eq!(rewards.len(), episodes);
                recorded.borrow_mut().push((episodes, agents.len()));
                Ok(())
            }),
        );
        let mut agent = TdAgent::q_learning(AgentConfig::default()).unwrap();
        let mut other = TdAgent::sarsa(AgentConfig::default()).unwrap();

        pipeline.run_self_play(&mut agent, &mut other).unwrap();

        assert_eq!(*calls.borrow(), vec![(3, 2), (6, 2)]);
    }

    #[test]
    fn test_result_rates() {
        let result = TrainingResult::from_rewards(vec![1.0, 0.0, -1.0, 1.0]);
        assert_eq!(result.wins, 2);
        assert_eq!(result.draws, 1);
        assert_eq!(result.losses, 1);
        assert_eq!(result.win_rate, 0.5);
        assert_eq!(TrainingResult::new(0, 0, 0, 0).win_rate, 0.0);
    }
}
