//! Epsilon-greedy Q-learning agent
//!
//! The agent owns its value table and its random source. Exploration draws
//! only happen in training mode, so greedy evaluation never advances the
//! RNG.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{q_table::QTable, serialization::SavedModel};
use crate::{
    Error, Result,
    app::AgentConfig,
    gridworld::{ACTION_COUNT, Action, GridState},
    ports::Learner,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Epsilon decays multiplicatively after every [`QLearningAgent::update`]
/// and never drops below the configured floor.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    epsilon: f64,
    initial_epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create an agent with a zeroed value table
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a hyperparameter is out of
    /// range.
    pub fn new(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(
                config.grid_size,
                config.learning_rate,
                config.discount_factor,
            ),
            epsilon: config.epsilon,
            initial_epsilon: config.epsilon,
            epsilon_decay: config.epsilon_decay,
            min_epsilon: config.min_epsilon,
            rng: build_rng(config.seed),
            rng_seed: config.seed,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Replace the exploration random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self.rng_seed = None;
        self
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// ε-greedy action selection
    ///
    /// With `training` off the agent always exploits.
    pub fn get_action(&mut self, state: &GridState, training: bool) -> Action {
        if training && self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            Action::ALL[self.rng.random_range(0..ACTION_COUNT)]
        } else {
            // Exploit: greedy action based on Q-values
            self.q_table.greedy_action(self.q_table.state_index(state))
        }
    }

    /// Apply one Q-learning update for a transition, then decay epsilon
    pub fn update(
        &mut self,
        state: &GridState,
        action: Action,
        reward: f64,
        next_state: &GridState,
    ) {
        let index = self.q_table.state_index(state);
        let next_index = self.q_table.state_index(next_state);
        self.q_table.q_learning_update(index, action, reward, next_index);
        self.decay_epsilon();
    }

    /// Q-values of every action at the snapshot's discretized state
    pub fn action_values(&self, state: &GridState) -> [f64; ACTION_COUNT] {
        *self.q_table.row(self.q_table.state_index(state))
    }

    /// Persist the value table and epsilon to `path`
    ///
    /// # Errors
    ///
    /// Returns an I/O or serialization error if the file cannot be written.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        SavedModel::from_agent(self).save_to_file(path)
    }

    /// Restore the value table and epsilon from `path`
    ///
    /// Loading is all-or-nothing: on any error the agent keeps its previous
    /// table and epsilon.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] if the file is missing, cannot be
    /// decoded, or does not match this agent's table shape.
    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let saved = SavedModel::load_from_file(path)?;
        self.apply_saved(saved).map_err(|reason| Error::ModelLoad {
            path: path.display().to_string(),
            reason,
        })
    }

    /// Validate a decoded artifact against this agent, then install it
    pub(crate) fn apply_saved(&mut self, saved: SavedModel) -> std::result::Result<(), String> {
        saved.check_shape(self.q_table.rows())?;
        if !self.q_table.replace_from_flat(&saved.values) {
            return Err("value table length does not match its declared shape".to_string());
        }
        self.epsilon = saved.epsilon;
        Ok(())
    }

    /// Decay epsilon after an update
    ///
    /// A loaded epsilon already below the floor is left alone, so epsilon
    /// never rises.
    fn decay_epsilon(&mut self) {
        if self.epsilon > self.min_epsilon {
            self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
        }
    }

    fn reset_rng(&mut self) {
        self.rng = build_rng(self.rng_seed);
    }
}

impl Learner for QLearningAgent {
    fn select_action(&mut self, state: &GridState, training: bool) -> Action {
        self.get_action(state, training)
    }

    fn learn(&mut self, state: &GridState, action: Action, reward: f64, next_state: &GridState) {
        self.update(state, action, reward, next_state);
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn epsilon(&self) -> Option<f64> {
        Some(self.epsilon)
    }

    fn reset(&mut self) -> Result<()> {
        self.q_table.reset();
        self.epsilon = self.initial_epsilon;
        self.reset_rng();
        Ok(())
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }

    fn action_values(&self, state: &GridState) -> Option<[f64; ACTION_COUNT]> {
        Some(QLearningAgent::action_values(self, state))
    }

    fn grid_size(&self) -> Option<usize> {
        Some(self.q_table.grid_size())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
