//! Episode orchestration
//!
//! [`EpisodeRunner`] plays one game between two participants on a shared
//! board and feeds every transition to the learning sides. Each learner only
//! ever sees its own transitions: when the turn comes back to it, it picks
//! its next action first and then updates the pending `(state, action)` pair
//! from its previous turn, bootstrapping from the position it now faces.
//! When the game ends, every learner with a pending pair receives the
//! terminal reward from its own perspective.

use tracing::trace;

use crate::{
    Error, Result,
    ports::Policy,
    q_learning::TdAgent,
    tictactoe::{Board, EpisodeOutcome, Move, Outcome, Player},
    types::{Action, StateKey},
};

/// One side of an episode.
pub enum Participant<'a> {
    /// A learning agent; receives TD updates.
    Learner(&'a mut TdAgent),
    /// A fixed policy (teacher, human, random); never updated.
    Policy(&'a mut dyn Policy),
}

impl Participant<'_> {
    /// Borrow the participant again for a shorter lifetime.
    pub fn reborrow(&mut self) -> Participant<'_> {
        match self {
            Participant::Learner(agent) => Participant::Learner(&mut **agent),
            Participant::Policy(policy) => Participant::Policy(&mut **policy),
        }
    }

    pub fn as_learner(&self) -> Option<&TdAgent> {
        match self {
            Participant::Learner(agent) => Some(&**agent),
            Participant::Policy(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Participant::Learner(agent) => agent.name(),
            Participant::Policy(policy) => policy.name(),
        }
    }
}

/// Record of a finished episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    pub outcome: EpisodeOutcome,
    /// Placements in the order they were made
    pub moves: Vec<Move>,
    pub first_player: Player,
    /// Key of the terminal position
    pub final_state: StateKey,
}

impl EpisodeReport {
    /// Terminal reward for `player`: +1 win, -1 loss, 0 draw.
    pub fn reward_for(&self, player: Player) -> f64 {
        self.outcome.reward_for(player)
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome.winner()
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Plays episodes on a board of a fixed size.
#[derive(Debug, Clone)]
pub struct EpisodeRunner {
    board: Board,
}

impl EpisodeRunner {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `board_size < 3`.
    pub fn new(board_size: usize) -> Result<Self> {
        Ok(Self {
            board: Board::new(board_size)?,
        })
    }

    pub fn board_size(&self) -> usize {
        self.board.size()
    }

    /// Board as left by the last episode.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Play one episode from an empty board.
    pub fn run<'p>(
        &mut self,
        x: Participant<'p>,
        o: Participant<'p>,
        first_player: Player,
    ) -> Result<EpisodeReport> {
        self.run_with(x, o, first_player, |_, _| Ok(()))
    }

    /// Play one episode, calling `on_move(step, mv)` after every placement.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] and [`Error::NoLegalActions`] from a
    /// participant end the episode immediately, as does any error returned
    /// by `on_move`.
    pub fn run_with<'p, F>(
        &mut self,
        x: Participant<'p>,
        o: Participant<'p>,
        first_player: Player,
        mut on_move: F,
    ) -> Result<EpisodeReport>
    where
        F: FnMut(usize, &Move) -> Result<()>,
    {
        self.board.reset();
        let mut sides = [x, o];
        let mut pending: [Option<(StateKey, Action)>; 2] = [None, None];
        let mut moves = Vec::with_capacity(self.board.size() * self.board.size());
        let mut player = first_player;

        let outcome = loop {
            let idx = player.index();
            let state = self.board.state_key();

            let (action, learner_state) = match &mut sides[idx] {
                Participant::Learner(agent) => {
                    let legal = self.board.empty_cells();
                    let action = agent.select_action(&state, &legal)?;
                    if let Some((prev_state, prev_action)) = pending[idx].take() {
                        agent.update(&prev_state, Some(&state), prev_action, Some(action), 0.0)?;
                    }
                    (action, Some(state))
                }
                Participant::Policy(policy) => {
                    let action = policy
                        .select_move(&self.board, player)?
                        .ok_or_else(|| Error::NoLegalActions {
                            state: state.to_string(),
                        })?;
                    (action, None)
                }
            };

            self.board.apply(action, player)?;
            if let Some(state) = learner_state {
                pending[idx] = Some((state, action));
            }

            let mv = Move { action, player };
            on_move(moves.len(), &mv)?;
            moves.push(mv);
            trace!(%player, %action, "move applied");

            match self.board.check_outcome(player) {
                Outcome::Win => break EpisodeOutcome::Win(player),
                Outcome::Draw => break EpisodeOutcome::Draw,
                Outcome::InProgress | Outcome::Loss => player = player.opponent(),
            }
        };

        for (side, participant) in [Player::X, Player::O].into_iter().zip(sides.iter_mut()) {
            if let Participant::Learner(agent) = participant
                && let Some((prev_state, prev_action)) = pending[side.index()].take()
            {
                agent.update(
                    &prev_state,
                    None,
                    prev_action,
                    None,
                    outcome.reward_for(side),
                )?;
            }
        }

        Ok(EpisodeReport {
            outcome,
            moves,
            first_player,
            final_state: self.board.state_key(),
        })
    }
}
