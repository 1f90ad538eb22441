//! Non-learning baseline policies for comparison runs

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Result,
    gridworld::{ACTION_COUNT, Action, GridState},
    ports::Learner,
};

/// Uniformly random policy (never learns)
pub struct RandomLearner {
    name: String,
    rng: StdRng,
}

impl RandomLearner {
    /// Create a new random learner
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random learner with a deterministic seed
    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Learner for RandomLearner {
    fn select_action(&mut self, _state: &GridState, _training: bool) -> Action {
        Action::ALL[self.rng.random_range(0..ACTION_COUNT)]
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }

    fn action_values(&self, _state: &GridState) -> Option<[f64; ACTION_COUNT]> {
        Some([1.0 / ACTION_COUNT as f64; ACTION_COUNT])
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Replays a fixed action script, then repeats its last action
///
/// Useful for scripted scenarios and for driving the session with a known
/// trajectory.
pub struct ScriptedLearner {
    name: String,
    script: Vec<Action>,
    cursor: usize,
}

impl ScriptedLearner {
    pub fn new(name: String, script: Vec<Action>) -> Self {
        Self {
            name,
            script,
            cursor: 0,
        }
    }
}

impl Learner for ScriptedLearner {
    fn select_action(&mut self, state: &GridState, _training: bool) -> Action {
        // A fresh episode restarts the script
        if state.steps == 0 {
            self.cursor = 0;
        }
        let action = self
            .script
            .get(self.cursor)
            .or(self.script.last())
            .copied()
            .unwrap_or(Action::Up);
        self.cursor += 1;
        action
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
