//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use tictactoe_td::{
    Result,
    ports::Policy,
    q_learning::{AgentConfig, TdAgent, TdAlgorithm},
    tictactoe::{Board, Player},
    types::{Action, StateKey},
};

/// Plays a fixed list of moves in order.
pub struct ScriptedPolicy {
    moves: VecDeque<Action>,
}

impl ScriptedPolicy {
    pub fn new(moves: &[(usize, usize)]) -> Self {
        Self {
            moves: moves.iter().map(|&m| Action::from(m)).collect(),
        }
    }
}

impl Policy for ScriptedPolicy {
    fn select_move(&mut self, _board: &Board, _player: Player) -> Result<Option<Action>> {
        Ok(self.moves.pop_front())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Replay `sequence` (alternating, `first` opens) and return the state key
/// before each move together with the move and its player.
pub fn states_along(
    size: usize,
    first: Player,
    sequence: &[(usize, usize)],
) -> Vec<(StateKey, Action, Player)> {
    let mut board = Board::new(size).unwrap();
    let mut player = first;
    let mut out = Vec::new();
    for &(row, col) in sequence {
        let action = Action::new(row, col);
        out.push((board.state_key(), action, player));
        board.apply(action, player).unwrap();
        player = player.opponent();
    }
    out
}

/// Greedy agent whose table prefers exactly `player`'s moves of `sequence`.
pub fn primed_agent(
    algorithm: TdAlgorithm,
    size: usize,
    first: Player,
    player: Player,
    sequence: &[(usize, usize)],
) -> TdAgent {
    let config = AgentConfig::default().with_epsilon(0.0).with_seed(1);
    let mut agent = TdAgent::new(algorithm, config).unwrap();
    for (state, action, mover) in states_along(size, first, sequence) {
        if mover == player {
            agent.q_table_mut().set(state, action, 1.0);
        }
    }
    agent
}
