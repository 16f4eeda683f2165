//! End-to-end episodes with scripted and primed participants

mod common;

use common::{ScriptedPolicy, primed_agent, states_along};
use tictactoe_td::{
    opponents::RandomPolicy,
    pipeline::{EpisodeRunner, Participant},
    q_learning::{AgentConfig, TdAgent, TdAlgorithm},
    tictactoe::{EpisodeOutcome, Player},
    types::Action,
};

const DRAW_SEQUENCE: [(usize, usize); 9] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 1),
    (1, 0),
    (1, 2),
    (2, 1),
    (2, 0),
    (2, 2),
];

const TOP_ROW_WIN: [(usize, usize); 5] = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)];

fn own_moves(sequence: &[(usize, usize)], first: Player, player: Player) -> Vec<(usize, usize)> {
    states_along(3, first, sequence)
        .into_iter()
        .filter(|(_, _, mover)| *mover == player)
        .map(|(_, action, _)| (action.row, action.col))
        .collect()
}

#[test]
fn scripted_draw_fills_the_board() {
    let mut runner = EpisodeRunner::new(3).unwrap();
    let mut x = ScriptedPolicy::new(&own_moves(&DRAW_SEQUENCE, Player::X, Player::X));
    let mut o = ScriptedPolicy::new(&own_moves(&DRAW_SEQUENCE, Player::X, Player::O));

    let report = runner
        .run(Participant::Policy(&mut x), Participant::Policy(&mut o), Player::X)
        .unwrap();

    assert_eq!(report.outcome, EpisodeOutcome::Draw);
    assert_eq!(report.len(), 9);
    assert_eq!(report.final_state.as_str(), "XOXXOOOXX");
    assert_eq!(report.reward_for(Player::X), 0.0);
    assert_eq!(report.reward_for(Player::O), 0.0);
}

#[test]
fn draw_gives_both_learners_zero_terminal_reward() {
    for algorithm in [TdAlgorithm::QLearning, TdAlgorithm::Sarsa] {
        let mut x = primed_agent(algorithm, 3, Player::X, Player::X, &DRAW_SEQUENCE);
        let mut o = primed_agent(algorithm, 3, Player::X, Player::O, &DRAW_SEQUENCE);
        let mut runner = EpisodeRunner::new(3).unwrap();

        let report = runner
            .run(Participant::Learner(&mut x), Participant::Learner(&mut o), Player::X)
            .unwrap();

        let played: Vec<Action> = report.moves.iter().map(|mv| mv.action).collect();
        let expected: Vec<Action> = DRAW_SEQUENCE.iter().map(|&m| Action::from(m)).collect();
        assert_eq!(played, expected);
        assert_eq!(report.outcome, EpisodeOutcome::Draw);

        let states = states_along(3, Player::X, &DRAW_SEQUENCE);

        // Terminal updates: 1.0 + 0.5 * (0 - 1.0)
        let (last_x_state, last_x_action, _) = &states[8];
        assert_eq!(x.q_table().lookup(last_x_state, *last_x_action), 0.5);
        let (last_o_state, last_o_action, _) = &states[7];
        assert_eq!(o.q_table().lookup(last_o_state, *last_o_action), 0.5);

        // Non-terminal updates bootstrap from the learner's next position:
        // 1.0 + 0.5 * (0.9 * 1.0 - 1.0)
        let (first_state, first_action, _) = &states[0];
        let value = x.q_table().lookup(first_state, *first_action);
        assert!((value - 0.95).abs() < 1e-12, "{algorithm:?}: {value}");
    }
}

#[test]
fn completing_the_top_row_wins_immediately() {
    let mut runner = EpisodeRunner::new(3).unwrap();
    let mut x = ScriptedPolicy::new(&own_moves(&TOP_ROW_WIN, Player::X, Player::X));
    // Extra moves that must never be requested
    let mut o = ScriptedPolicy::new(&[(1, 0), (1, 1), (2, 2), (2, 1)]);

    let report = runner
        .run(Participant::Policy(&mut x), Participant::Policy(&mut o), Player::X)
        .unwrap();

    assert_eq!(report.outcome, EpisodeOutcome::Win(Player::X));
    assert_eq!(report.len(), 5);
    assert_eq!(report.reward_for(Player::X), 1.0);
    assert_eq!(report.reward_for(Player::O), -1.0);
    assert_eq!(runner.board().empty_cells().len(), 4);
}

#[test]
fn losing_learner_receives_negative_reward() {
    let mut x = ScriptedPolicy::new(&own_moves(&TOP_ROW_WIN, Player::X, Player::X));
    let mut o = primed_agent(TdAlgorithm::QLearning, 3, Player::X, Player::O, &TOP_ROW_WIN);
    let mut runner = EpisodeRunner::new(3).unwrap();

    let report = runner
        .run(Participant::Policy(&mut x), Participant::Learner(&mut o), Player::X)
        .unwrap();
    assert_eq!(report.winner(), Some(Player::X));

    let states = states_along(3, Player::X, &TOP_ROW_WIN);
    // Terminal: 1.0 + 0.5 * (-1 - 1.0)
    let (last_state, last_action, _) = &states[3];
    assert_eq!(o.q_table().lookup(last_state, *last_action), 0.0);
    // Non-terminal: 1.0 + 0.5 * (0.9 * 1.0 - 1.0)
    let (first_state, first_action, _) = &states[1];
    assert!((o.q_table().lookup(first_state, *first_action) - 0.95).abs() < 1e-12);
    assert_eq!(o.q_table_size(), 2);
}

#[test]
fn scripted_illegal_move_is_fatal() {
    let mut runner = EpisodeRunner::new(3).unwrap();
    let mut x = ScriptedPolicy::new(&[(0, 0), (0, 1)]);
    let mut o = ScriptedPolicy::new(&[(0, 0)]);

    let err = runner
        .run(Participant::Policy(&mut x), Participant::Policy(&mut o), Player::X)
        .unwrap_err();
    assert!(matches!(
        err,
        tictactoe_td::Error::IllegalMove { row: 0, col: 0, .. }
    ));
}

#[test]
fn exhausted_policy_on_open_board_is_reported() {
    let mut runner = EpisodeRunner::new(3).unwrap();
    let mut x = ScriptedPolicy::new(&[(0, 0)]);
    let mut o = ScriptedPolicy::new(&[]);

    let err = runner
        .run(Participant::Policy(&mut x), Participant::Policy(&mut o), Player::X)
        .unwrap_err();
    assert!(matches!(err, tictactoe_td::Error::NoLegalActions { .. }));
}

fn exploring(algorithm: TdAlgorithm) -> TdAgent {
    let config = AgentConfig::default()
        .with_learning_rate(0.5)
        .with_discount_factor(0.9)
        .with_epsilon(1.0)
        .with_seed(31);
    TdAgent::new(algorithm, config).unwrap()
}

/// Value of X's opening pair after one episode in which X's second move is
/// an exploratory one worth 0.2 while every other reply is worth 0.8.
fn opening_value_after_exploration(algorithm: TdAlgorithm) -> f64 {
    // With epsilon = 1 the moves depend only on the seeds, not on the table
    let mut runner = EpisodeRunner::new(3).unwrap();
    let mut scout = exploring(algorithm);
    let mut random = RandomPolicy::with_seed(5);
    let report = runner
        .run(
            Participant::Learner(&mut scout),
            Participant::Policy(&mut random),
            Player::X,
        )
        .unwrap();
    let sequence: Vec<(usize, usize)> = report
        .moves
        .iter()
        .map(|mv| (mv.action.row, mv.action.col))
        .collect();
    let states = states_along(3, Player::X, &sequence);
    let (opening_state, opening_action, _) = states[0].clone();
    let (second_state, played, _) = states[2].clone();

    let mut agent = exploring(algorithm);
    for action in second_state.empty_cells() {
        let value = if action == played { 0.2 } else { 0.8 };
        agent.q_table_mut().set(second_state.clone(), action, value);
    }
    let mut random = RandomPolicy::with_seed(5);
    let replay = runner
        .run(
            Participant::Learner(&mut agent),
            Participant::Policy(&mut random),
            Player::X,
        )
        .unwrap();
    assert_eq!(replay.moves, report.moves);

    agent.q_table().lookup(&opening_state, opening_action)
}

#[test]
fn sarsa_bootstraps_from_the_move_it_actually_plays() {
    let value = opening_value_after_exploration(TdAlgorithm::Sarsa);
    assert!((value - 0.5 * 0.9 * 0.2).abs() < 1e-12);
}

#[test]
fn q_learning_bootstraps_from_the_best_reply_instead() {
    let value = opening_value_after_exploration(TdAlgorithm::QLearning);
    assert!((value - 0.5 * 0.9 * 0.8).abs() < 1e-12);
}
