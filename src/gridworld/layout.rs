//! Board geometry and reward magnitudes
//!
//! Both types default to the canonical puzzle: a 6×6 board with the agent
//! starting in the top-left corner, the treasure in the opposite corner,
//! three keys and two traps in between.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::{Error, Result};

/// Static placement of every entity on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Side length of the square board
    pub grid_size: usize,
    /// Agent position after reset
    pub start: Position,
    /// Terminal goal cell
    pub treasure: Position,
    /// Keys that must all be collected before the treasure pays out
    pub keys: Vec<Position>,
    /// Cells that end the episode with a penalty
    pub traps: Vec<Position>,
    /// Steps allowed while at least one key is still on the board
    pub step_budget: usize,
    /// Steps allowed once every key has been collected
    pub step_budget_with_keys: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            grid_size: 6,
            start: Position::new(0, 0),
            treasure: Position::new(5, 5),
            keys: vec![Position::new(1, 2), Position::new(3, 1), Position::new(4, 4)],
            traps: vec![Position::new(2, 3), Position::new(5, 2)],
            step_budget: 100,
            step_budget_with_keys: 50,
        }
    }
}

impl GridLayout {
    /// Number of keys on a freshly reset board
    pub fn total_keys(&self) -> usize {
        self.keys.len()
    }

    /// Check that the layout describes a playable board.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when an entity lies outside
    /// the grid, two entities share a cell, the start overlaps an entity,
    /// there are no keys, or a step budget is zero.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if self.grid_size == 0 {
            return invalid("grid size must be positive".to_string());
        }
        if self.keys.is_empty() {
            return invalid("layout needs at least one key".to_string());
        }
        if self.step_budget == 0 || self.step_budget_with_keys == 0 {
            return invalid("step budgets must be positive".to_string());
        }

        let mut occupied = BTreeSet::new();
        let entities = std::iter::once(("treasure", self.treasure))
            .chain(self.keys.iter().map(|&k| ("key", k)))
            .chain(self.traps.iter().map(|&t| ("trap", t)));
        for (kind, pos) in entities {
            if !pos.in_bounds(self.grid_size) {
                return invalid(format!(
                    "{kind} at {pos} lies outside the {0}x{0} grid",
                    self.grid_size
                ));
            }
            if !occupied.insert(pos) {
                return invalid(format!("{kind} at {pos} overlaps another entity"));
            }
        }

        if !self.start.in_bounds(self.grid_size) {
            return invalid(format!("start {} lies outside the grid", self.start));
        }
        if occupied.contains(&self.start) {
            return invalid(format!("start {} overlaps an entity", self.start));
        }

        Ok(())
    }
}

/// Reward magnitudes for every transition outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    pub trap: f64,
    pub key: f64,
    /// Extra reward when the final key is picked up
    pub all_keys_bonus: f64,
    pub treasure_base: f64,
    /// Added to `treasure_base` per collected key
    pub treasure_per_key: f64,
    pub treasure_without_keys: f64,
    pub toward_key: f64,
    pub away_from_key: f64,
    pub neutral_move: f64,
    pub toward_treasure: f64,
    pub away_from_treasure: f64,
    /// Budget exhausted with keys still on the board
    pub timeout_without_keys: f64,
    /// Budget exhausted holding every key but off the treasure
    pub timeout_with_keys: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            trap: -100.0,
            key: 50.0,
            all_keys_bonus: 100.0,
            treasure_base: 500.0,
            treasure_per_key: 100.0,
            treasure_without_keys: -200.0,
            toward_key: 3.0,
            away_from_key: -2.0,
            neutral_move: -1.0,
            toward_treasure: 5.0,
            away_from_treasure: -3.0,
            timeout_without_keys: -50.0,
            timeout_with_keys: -30.0,
        }
    }
}

impl RewardSchedule {
    /// Terminal reward for reaching the treasure with `collected` keys
    pub fn treasure_reward(&self, collected: usize) -> f64 {
        self.treasure_base + self.treasure_per_key * collected as f64
    }
}
