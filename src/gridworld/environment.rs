//! Deterministic grid simulator with mandatory-keys-before-treasure rules

use std::collections::BTreeSet;

use tracing::debug;

use super::{
    action::Action,
    layout::{GridLayout, RewardSchedule},
    position::Position,
    state::GridState,
};
use crate::Result;

/// What the candidate cell turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landing {
    Trap,
    Key,
    Treasure,
    Plain,
}

/// Grid-world environment
///
/// Owns the mutable episode state and hands out [`GridState`] copies.
/// Once an episode is done, [`Environment::step`] is a no-op until
/// [`Environment::reset`] is called.
#[derive(Debug, Clone)]
pub struct Environment {
    layout: GridLayout,
    rewards: RewardSchedule,
    agent_pos: Position,
    keys_remaining: BTreeSet<Position>,
    collected_keys: BTreeSet<Position>,
    traps: BTreeSet<Position>,
    steps: usize,
    done: bool,
    cumulative_reward: f64,
    last_action: Option<Action>,
}

impl Environment {
    /// Create an environment on the canonical board, already reset
    pub fn new() -> Self {
        Self::from_parts(GridLayout::default(), RewardSchedule::default())
    }

    /// Create an environment on a custom board
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the layout fails
    /// validation.
    pub fn with_layout(layout: GridLayout, rewards: RewardSchedule) -> Result<Self> {
        layout.validate()?;
        Ok(Self::from_parts(layout, rewards))
    }

    fn from_parts(layout: GridLayout, rewards: RewardSchedule) -> Self {
        let mut env = Self {
            agent_pos: layout.start,
            keys_remaining: BTreeSet::new(),
            collected_keys: BTreeSet::new(),
            traps: BTreeSet::new(),
            steps: 0,
            done: false,
            cumulative_reward: 0.0,
            last_action: None,
            layout,
            rewards,
        };
        env.reset();
        env
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn rewards(&self) -> &RewardSchedule {
        &self.rewards
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn has_all_keys(&self) -> bool {
        self.collected_keys.len() == self.layout.total_keys()
    }

    /// Restore the initial board and return its snapshot
    pub fn reset(&mut self) -> GridState {
        self.agent_pos = self.layout.start;
        self.keys_remaining = self.layout.keys.iter().copied().collect();
        self.collected_keys.clear();
        self.traps = self.layout.traps.iter().copied().collect();
        self.steps = 0;
        self.done = false;
        self.cumulative_reward = 0.0;
        self.last_action = None;
        self.state()
    }

    /// Snapshot of the current episode
    pub fn state(&self) -> GridState {
        GridState {
            grid_size: self.layout.grid_size,
            agent_pos: self.agent_pos,
            treasure_pos: self.layout.treasure,
            keys_remaining: self.keys_remaining.clone(),
            collected_keys: self.collected_keys.clone(),
            traps: self.traps.clone(),
            total_keys: self.layout.total_keys(),
            steps: self.steps,
            done: self.done,
            cumulative_reward: self.cumulative_reward,
            has_all_keys: self.has_all_keys(),
            last_action: self.last_action,
        }
    }

    /// Apply an action given by its numeric identifier
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] for identifiers outside
    /// `0..=3`, even when the episode is already done.
    pub fn step_id(&mut self, action: usize) -> Result<GridState> {
        let action = Action::try_from(action)?;
        Ok(self.step(action))
    }

    /// Apply one action and return the resulting snapshot
    pub fn step(&mut self, action: Action) -> GridState {
        if self.done {
            return self.state();
        }

        self.last_action = Some(action);
        let previous = self.agent_pos;
        let candidate = previous.stepped(action, self.layout.grid_size);

        let mut reward = match self.classify(candidate) {
            Landing::Trap => {
                self.done = true;
                debug!(cell = %candidate, steps = self.steps + 1, "agent stepped on a trap");
                self.rewards.trap
            }
            Landing::Key => {
                self.keys_remaining.remove(&candidate);
                self.collected_keys.insert(candidate);
                if self.has_all_keys() {
                    debug!(steps = self.steps + 1, "all keys collected");
                    self.rewards.key + self.rewards.all_keys_bonus
                } else {
                    self.rewards.key
                }
            }
            Landing::Treasure => {
                self.done = true;
                if self.has_all_keys() {
                    debug!(steps = self.steps + 1, "treasure reached with all keys");
                    self.rewards.treasure_reward(self.collected_keys.len())
                } else {
                    debug!(
                        steps = self.steps + 1,
                        missing = self.keys_remaining.len(),
                        "treasure reached without all keys"
                    );
                    self.rewards.treasure_without_keys
                }
            }
            Landing::Plain => self.shaping_reward(previous, candidate),
        };
        self.agent_pos = candidate;
        self.steps += 1;

        if !self.done && self.steps >= self.step_budget() {
            self.done = true;
            if !self.has_all_keys() {
                reward += self.rewards.timeout_without_keys;
            } else if self.agent_pos != self.layout.treasure {
                reward += self.rewards.timeout_with_keys;
            }
            debug!(steps = self.steps, "step budget exhausted");
        }

        self.cumulative_reward += reward;
        self.state()
    }

    fn classify(&self, candidate: Position) -> Landing {
        if self.traps.contains(&candidate) {
            Landing::Trap
        } else if self.keys_remaining.contains(&candidate) {
            Landing::Key
        } else if candidate == self.layout.treasure {
            Landing::Treasure
        } else {
            Landing::Plain
        }
    }

    /// Heuristic reward for a move that lands on an empty cell.
    ///
    /// Before all keys are held, the distance from the candidate to the
    /// nearest remaining key is compared with the displacement of the move
    /// itself (previous to candidate), not with the previous distance to
    /// that key.
    fn shaping_reward(&self, previous: Position, candidate: Position) -> f64 {
        if self.has_all_keys() {
            let treasure = self.layout.treasure;
            if candidate.manhattan(treasure) < previous.manhattan(treasure) {
                self.rewards.toward_treasure
            } else {
                self.rewards.away_from_treasure
            }
        } else {
            let nearest_key = self
                .keys_remaining
                .iter()
                .map(|&key| candidate.manhattan(key))
                .min()
                .unwrap_or(usize::MAX);
            let displacement = previous.manhattan(candidate);
            match nearest_key.cmp(&displacement) {
                std::cmp::Ordering::Less => self.rewards.toward_key,
                std::cmp::Ordering::Greater => self.rewards.away_from_key,
                std::cmp::Ordering::Equal => self.rewards.neutral_move,
            }
        }
    }

    fn step_budget(&self) -> usize {
        if self.has_all_keys() {
            self.layout.step_budget_with_keys
        } else {
            self.layout.step_budget
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
