//! Common test utilities for the keyquest test suite.
//!
//! Action scripts for the canonical board, shared by the scenario and
//! pipeline tests.

#![allow(dead_code)]

use keyquest::{Action, Environment, GridState};

/// Parse a compact script such as `"RRDDDLDRRRDR"` into actions.
pub fn script(moves: &str) -> Vec<Action> {
    moves
        .chars()
        .map(|c| match c {
            'U' => Action::Up,
            'D' => Action::Down,
            'L' => Action::Left,
            'R' => Action::Right,
            other => panic!("unknown move '{other}'"),
        })
        .collect()
}

/// Collects all three keys in ten steps without touching a trap.
pub const ALL_KEYS_ROUTE: &str = "RRDDDLDRRR";

/// The ten-step key route followed by the two steps to the treasure.
pub const PERFECT_ROUTE: &str = "RRDDDLDRRRDR";

/// Apply every action in order and return the last snapshot.
pub fn play(env: &mut Environment, actions: &[Action]) -> GridState {
    let mut state = env.state();
    for &action in actions {
        state = env.step(action);
    }
    state
}
