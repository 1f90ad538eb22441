//! Immutable snapshots of the environment

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{action::Action, position::Position};

/// Snapshot of the environment after a reset or a step
///
/// Snapshots are owned copies: mutating one never affects the environment
/// that produced it, and later steps never affect a snapshot already handed
/// out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridState {
    pub grid_size: usize,
    pub agent_pos: Position,
    pub treasure_pos: Position,
    pub keys_remaining: BTreeSet<Position>,
    pub collected_keys: BTreeSet<Position>,
    pub traps: BTreeSet<Position>,
    pub total_keys: usize,
    pub steps: usize,
    pub done: bool,
    pub cumulative_reward: f64,
    pub has_all_keys: bool,
    pub last_action: Option<Action>,
}

impl GridState {
    /// Number of keys picked up so far this episode
    pub fn keys_collected(&self) -> usize {
        self.collected_keys.len()
    }

    /// Whether the agent is standing on the treasure cell
    pub fn on_treasure(&self) -> bool {
        self.agent_pos == self.treasure_pos
    }

    /// Whether the episode ended on the treasure with every key collected
    pub fn is_success(&self) -> bool {
        self.on_treasure() && self.has_all_keys
    }
}
