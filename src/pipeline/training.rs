//! Training session: drives the environment/learner loop

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::statistics::{BatchSummary, EpisodeOutcome, TrailingStats, TrainingStatistics};
use crate::{
    Error, Result,
    gridworld::{Action, Environment, GridState},
    ports::{Learner, Observer},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Apply learning updates after every transition
    pub training: bool,

    /// Random seed handed to the learner on first use
    pub seed: Option<u64>,

    /// Report trailing statistics every N episodes of a batch
    pub report_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            training: true,
            seed: None,
            report_interval: 10,
        }
    }
}

/// Cooperative cancellation flag checked between episodes
///
/// Clones share the flag, so a driver thread or signal handler can cancel
/// a batch that is running elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a single driven step
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub action: Action,
    /// Change in cumulative reward caused by this step
    pub reward: f64,
    pub state: GridState,
    /// Present when this step ended the episode
    pub outcome: Option<EpisodeOutcome>,
}

/// Episode driver and statistics owner
///
/// The session owns the environment, the per-episode history and its
/// observers; the learner is borrowed for each call so the caller keeps
/// ownership (e.g. to save it afterwards).
pub struct TrainingSession {
    config: TrainingConfig,
    env: Environment,
    statistics: TrainingStatistics,
    observers: Vec<Box<dyn Observer>>,
    /// Current snapshot of an episode advanced through [`TrainingSession::step`]
    live: Option<GridState>,
    seeded: bool,
}

impl TrainingSession {
    /// Create a session on the canonical board
    pub fn new(config: TrainingConfig) -> Self {
        Self::with_environment(config, Environment::new())
    }

    /// Create a session on a caller-supplied environment
    ///
    /// Driving calls fail with [`Error::InvalidConfiguration`] when the
    /// learner's table was built for a different board size.
    pub fn with_environment(config: TrainingConfig, env: Environment) -> Self {
        Self {
            config,
            env,
            statistics: TrainingStatistics::new(),
            observers: Vec::new(),
            live: None,
            seeded: false,
        }
    }

    /// Add an observer to the session
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn statistics(&self) -> &TrainingStatistics {
        &self.statistics
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Enable or disable learning updates for subsequent episodes
    pub fn set_training(&mut self, training: bool) {
        self.config.training = training;
    }

    /// Snapshot of the episode being driven step by step, if any
    pub fn current_state(&self) -> Option<&GridState> {
        self.live.as_ref()
    }

    /// Trailing statistics including the learner's current epsilon
    pub fn trailing_stats(&self, learner: &dyn Learner) -> TrailingStats {
        self.statistics.trailing(learner.epsilon())
    }

    /// Run one full episode from reset to terminal
    ///
    /// Abandons any episode started through [`TrainingSession::step`].
    pub fn run_episode(&mut self, learner: &mut dyn Learner) -> Result<EpisodeOutcome> {
        self.check_learner(learner)?;
        self.seed_learner(learner)?;
        self.live = None;

        let mut state = self.begin_episode()?;
        while !state.done {
            let (_, _, next_state) = self.advance(learner, &state)?;
            state = next_state;
        }
        self.finish_episode(learner, &state)
    }

    /// Run up to `episodes` episodes back to back
    ///
    /// `cancel` is checked before every episode; a cancelled batch keeps
    /// everything recorded so far and still notifies observers that
    /// training ended.
    pub fn run_batch(
        &mut self,
        learner: &mut dyn Learner,
        episodes: usize,
        cancel: &CancellationToken,
    ) -> Result<BatchSummary> {
        self.check_learner(learner)?;
        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let mut outcomes = Vec::with_capacity(episodes);
        let mut cancelled = false;
        let interval = self.config.report_interval.max(1);

        for episode in 0..episodes {
            if cancel.is_cancelled() {
                cancelled = true;
                info!(
                    completed = outcomes.len(),
                    requested = episodes,
                    "batch cancelled"
                );
                break;
            }

            outcomes.push(self.run_episode(learner)?);

            if episode.is_multiple_of(interval) || episode + 1 == episodes {
                let stats = self.trailing_stats(learner);
                for observer in &mut self.observers {
                    observer.on_report(&stats)?;
                }
            }
        }

        let stats = self.trailing_stats(learner);
        for observer in &mut self.observers {
            observer.on_training_end(&stats)?;
        }

        Ok(BatchSummary::from_outcomes(
            episodes,
            &outcomes,
            cancelled,
            &self.statistics,
            learner.epsilon(),
        ))
    }

    /// Advance the live episode by one transition
    ///
    /// Starts a new episode first when none is live. When the step ends the
    /// episode, its outcome is recorded and returned in the report.
    pub fn step(&mut self, learner: &mut dyn Learner) -> Result<StepReport> {
        self.check_learner(learner)?;
        self.seed_learner(learner)?;

        let state = match self.live.take() {
            Some(state) if !state.done => state,
            _ => self.begin_episode()?,
        };

        let (action, reward, next_state) = self.advance(learner, &state)?;
        let outcome = if next_state.done {
            Some(self.finish_episode(learner, &next_state)?)
        } else {
            self.live = Some(next_state.clone());
            None
        };

        Ok(StepReport {
            action,
            reward,
            state: next_state,
            outcome,
        })
    }

    fn check_learner(&self, learner: &dyn Learner) -> Result<()> {
        let board = self.env.layout().grid_size;
        match learner.grid_size() {
            Some(size) if size != board => Err(Error::InvalidConfiguration {
                message: format!(
                    "{} expects a {size}x{size} board but the session runs on {board}x{board}",
                    learner.name()
                ),
            }),
            _ => Ok(()),
        }
    }

    fn seed_learner(&mut self, learner: &mut dyn Learner) -> Result<()> {
        if !self.seeded {
            if let Some(seed) = self.config.seed {
                learner.set_rng_seed(seed)?;
            }
            self.seeded = true;
        }
        Ok(())
    }

    fn begin_episode(&mut self) -> Result<GridState> {
        let state = self.env.reset();
        let episode = self.statistics.len();
        for observer in &mut self.observers {
            observer.on_episode_start(episode, &state)?;
        }
        Ok(state)
    }

    fn advance(
        &mut self,
        learner: &mut dyn Learner,
        state: &GridState,
    ) -> Result<(Action, f64, GridState)> {
        let action = learner.select_action(state, self.config.training);
        let next_state = self.env.step(action);
        let reward = next_state.cumulative_reward - state.cumulative_reward;

        if self.config.training {
            learner.learn(state, action, reward, &next_state);
        }

        let episode = self.statistics.len();
        for observer in &mut self.observers {
            observer.on_step(episode, action, reward, &next_state)?;
        }

        Ok((action, reward, next_state))
    }

    fn finish_episode(
        &mut self,
        learner: &dyn Learner,
        final_state: &GridState,
    ) -> Result<EpisodeOutcome> {
        let outcome = EpisodeOutcome::from_final_state(self.statistics.len(), final_state);
        self.statistics.record(&outcome);
        self.live = None;

        debug!(
            episode = outcome.episode,
            reward = outcome.total_reward,
            success = outcome.success,
            keys = outcome.keys_collected,
            steps = outcome.steps,
            "episode finished"
        );

        let stats = self.trailing_stats(learner);
        for observer in &mut self.observers {
            observer.on_episode_end(outcome.episode, &outcome, &stats)?;
        }
        Ok(outcome)
    }
}
