//! Configuration types for agent creation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hyperparameters for a [`crate::q_learning::QLearningAgent`].
///
/// Builder-style API; `Default` gives the tuned values for the canonical
/// 6×6 board.
///
/// # Examples
///
/// ```
/// use keyquest::app::AgentConfig;
///
/// let config = AgentConfig::default()
///     .with_seed(42)
///     .with_learning_rate(0.1)
///     .with_min_epsilon(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Side length of the board the value table is sized for
    pub grid_size: usize,
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Initial exploration rate
    pub epsilon: f64,
    /// Multiplicative decay applied after every update
    pub epsilon_decay: f64,
    /// Exploration floor
    pub min_epsilon: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            grid_size: 6,
            learning_rate: 0.2,
            discount_factor: 0.9,
            epsilon: 1.0,
            epsilon_decay: 0.999,
            min_epsilon: 0.01,
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Set the board size the value table covers.
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Set the learning rate α.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor γ.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the initial exploration rate.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the per-update epsilon decay factor.
    pub fn with_epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    /// Set the exploration floor.
    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every hyperparameter lies in its meaningful range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("learning_rate", self.learning_rate, 0.0, 1.0),
            ("discount_factor", self.discount_factor, 0.0, 1.0),
            ("epsilon", self.epsilon, 0.0, 1.0),
            ("epsilon_decay", self.epsilon_decay, 0.0, 1.0),
            ("min_epsilon", self.min_epsilon, 0.0, 1.0),
        ];
        for (name, value, low, high) in checks {
            if !value.is_finite() || value < low || value > high {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must lie in [{low}, {high}], got {value}"),
                });
            }
        }
        if self.min_epsilon > self.epsilon {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "min_epsilon ({}) exceeds initial epsilon ({})",
                    self.min_epsilon, self.epsilon
                ),
            });
        }
        if self.grid_size == 0 {
            return Err(Error::InvalidConfiguration {
                message: "grid_size must be positive".to_string(),
            });
        }
        Ok(())
    }
}
