//! Learner port - abstraction over action-selecting agents
//!
//! The training session drives any implementation of this trait, so the
//! Q-learning agent and fixed baselines run through the same loop.

use crate::{
    Result,
    gridworld::{ACTION_COUNT, Action, GridState},
};

/// Unified interface for agents acting in the grid environment
///
/// # Examples
///
/// ```no_run
/// use keyquest::{gridworld::Environment, ports::Learner};
///
/// fn greedy_rollout(agent: &mut dyn Learner) -> f64 {
///     let mut env = Environment::new();
///     let mut state = env.reset();
///     while !state.done {
///         let action = agent.select_action(&state, false);
///         state = env.step(action);
///     }
///     state.cumulative_reward
/// }
/// ```
pub trait Learner: Send {
    /// Choose the next action for `state`.
    ///
    /// `training` enables exploration; with it off the learner should
    /// return its best-known action.
    fn select_action(&mut self, state: &GridState, training: bool) -> Action;

    /// Learn from one transition.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for fixed policies.
    fn learn(
        &mut self,
        _state: &GridState,
        _action: Action,
        _reward: f64,
        _next_state: &GridState,
    ) {
    }

    /// Get the learner's name.
    ///
    /// Used for identification in comparisons and logging.
    fn name(&self) -> &str;

    /// Current exploration rate, for learners that have one.
    fn epsilon(&self) -> Option<f64> {
        None
    }

    /// Reset learner state to initial conditions.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for stateless learners.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Seed the learner's internal random number generator.
    ///
    /// Training sessions call this when configured with a seed.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Side length of the board the learner's state encoding assumes, if it
    /// has one.
    ///
    /// Sessions refuse to drive a learner whose board differs from theirs.
    fn grid_size(&self) -> Option<usize> {
        None
    }

    /// Value estimates for every action at `state`, if the learner keeps
    /// any.
    fn action_values(&self, _state: &GridState) -> Option<[f64; ACTION_COUNT]> {
        None
    }

    /// Enable downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;
}
