//! Scripted episodes on the canonical board with exact reward totals

mod common;

use common::{ALL_KEYS_ROUTE, PERFECT_ROUTE, play, script};
use keyquest::{Action, Environment, Error, Position};

#[test]
fn perfect_route_collects_every_key_and_the_treasure() {
    let mut env = Environment::new();
    let state = play(&mut env, &script(PERFECT_ROUTE));

    assert!(state.done);
    assert!(state.is_success());
    assert_eq!(state.steps, 12);
    assert_eq!(state.keys_collected(), 3);
    assert!(state.keys_remaining.is_empty());
    assert_eq!(state.agent_pos, Position::new(5, 5));
    assert_eq!(state.cumulative_reward, 1044.0);
}

#[test]
fn trap_ends_the_episode_with_penalty() {
    let mut env = Environment::new();
    let state = play(&mut env, &script("RRRDD"));

    assert!(state.done);
    assert!(!state.is_success());
    assert_eq!(state.agent_pos, Position::new(2, 3));
    assert_eq!(state.steps, 5);
    assert_eq!(state.cumulative_reward, -106.0);
}

#[test]
fn treasure_without_keys_is_penalised() {
    let mut env = Environment::new();
    let state = play(&mut env, &script("RRRRRDDDDD"));

    assert!(state.done);
    assert!(!state.is_success());
    assert!(state.on_treasure());
    assert_eq!(state.steps, 10);
    assert_eq!(state.cumulative_reward, -216.0);
}

#[test]
fn keyless_timeout_after_one_hundred_steps() {
    let mut env = Environment::new();
    let mut state = env.state();
    for step in 1..=100 {
        assert!(!state.done, "episode ended early at step {step}");
        state = env.step(Action::Up);
    }

    assert!(state.done);
    assert_eq!(state.steps, 100);
    assert_eq!(state.agent_pos, Position::new(0, 0));
    // 100 wall bumps at -2 each, then the -50 timeout penalty
    assert_eq!(state.cumulative_reward, -250.0);
}

#[test]
fn all_keys_budget_is_fifty_steps() {
    let mut env = Environment::new();
    let state = play(&mut env, &script(ALL_KEYS_ROUTE));
    assert!(state.has_all_keys);
    assert_eq!(state.steps, 10);
    assert_eq!(state.cumulative_reward, 239.0);

    // Shuttle between (4,4) and (5,4) without touching the treasure
    let mut state = state;
    for _ in 0..20 {
        state = env.step(Action::Up);
        state = env.step(Action::Down);
    }

    assert!(state.done);
    assert!(!state.is_success());
    assert_eq!(state.steps, 50);
    assert_eq!(state.cumulative_reward, 249.0);
}

#[test]
fn late_final_key_closes_the_episode_immediately() {
    let mut env = Environment::new();
    for _ in 0..50 {
        env.step(Action::Up);
    }
    let state = play(&mut env, &script(ALL_KEYS_ROUTE));

    assert!(state.done);
    assert!(state.has_all_keys);
    assert!(!state.is_success());
    assert_eq!(state.steps, 60);
    assert_eq!(state.cumulative_reward, 109.0);
}

#[test]
fn steps_after_done_change_nothing() {
    let mut env = Environment::new();
    let terminal = play(&mut env, &script("RRRDD"));

    for action in Action::ALL {
        let state = env.step(action);
        assert_eq!(state.agent_pos, terminal.agent_pos);
        assert_eq!(state.steps, terminal.steps);
        assert_eq!(state.cumulative_reward, terminal.cumulative_reward);
        assert!(state.done);
    }
}

#[test]
fn invalid_identifier_is_rejected_without_mutation() {
    let mut env = Environment::new();
    env.step(Action::Right);
    let before = env.state();

    let err = env.step_id(4).unwrap_err();
    assert!(matches!(err, Error::InvalidAction { action: 4 }));
    assert_eq!(env.state(), before);

    let state = env.step_id(1).unwrap();
    assert_eq!(state.agent_pos, Position::new(1, 1));
}

#[test]
fn reset_restores_the_board_after_an_episode() {
    let mut env = Environment::new();
    play(&mut env, &script(PERFECT_ROUTE));

    let state = env.reset();
    assert_eq!(state.agent_pos, Position::new(0, 0));
    assert_eq!(state.keys_remaining.len(), 3);
    assert!(state.collected_keys.is_empty());
    assert_eq!(state.steps, 0);
    assert_eq!(state.cumulative_reward, 0.0);
    assert!(!state.done);
    assert!(state.last_action.is_none());
}

#[test]
fn snapshots_are_independent_of_later_steps() {
    let mut env = Environment::new();
    let first = env.step(Action::Right);
    let mut copy = first.clone();
    copy.keys_remaining.clear();

    play(&mut env, &script("RD"));
    assert_eq!(first.agent_pos, Position::new(0, 1));
    assert_eq!(first.keys_remaining.len(), 3);
    assert_eq!(env.state().keys_remaining.len(), 2);
}

#[test]
fn third_key_pays_key_reward_plus_bonus_in_one_step() {
    let mut env = Environment::new();
    let actions = script(ALL_KEYS_ROUTE);
    let (last, route) = actions.split_last().unwrap();
    let before = play(&mut env, route);
    assert_eq!(before.keys_collected(), 2);

    let after = env.step(*last);
    assert!(after.has_all_keys);
    assert!(!after.done);
    assert_eq!(after.cumulative_reward - before.cumulative_reward, 150.0);
}
