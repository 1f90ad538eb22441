//! Observer port - abstraction for training observation and data collection
//!
//! Observers collect data during training without coupling the training
//! loop to any output format.

use crate::{
    Result,
    gridworld::{Action, GridState},
    pipeline::{EpisodeOutcome, TrailingStats},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once per batch
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - after every transition
///    - `on_episode_end(episode, outcome, stats)`
///    - `on_report(stats)` - at the configured cadence
/// 3. `on_training_end(stats)` - once per batch, also after cancellation
///
/// Single-step driving emits the episode and step events but no training
/// start/end events.
pub trait Observer: Send {
    /// Called when a batch starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after the environment is reset for a new episode.
    ///
    /// `episode` is the 0-based index across the whole session.
    fn on_episode_start(&mut self, _episode: usize, _state: &GridState) -> Result<()> {
        Ok(())
    }

    /// Called after each transition, before the next action is chosen.
    fn on_step(
        &mut self,
        _episode: usize,
        _action: Action,
        _reward: f64,
        _next_state: &GridState,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once the episode is terminal and its statistics are recorded.
    fn on_episode_end(
        &mut self,
        _episode: usize,
        _outcome: &EpisodeOutcome,
        _stats: &TrailingStats,
    ) -> Result<()> {
        Ok(())
    }

    /// Called at the reporting cadence during batch runs.
    fn on_report(&mut self, _stats: &TrailingStats) -> Result<()> {
        Ok(())
    }

    /// Called when a batch finishes or is cancelled.
    fn on_training_end(&mut self, _stats: &TrailingStats) -> Result<()> {
        Ok(())
    }
}
