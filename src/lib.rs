//! Tabular Q-learning on a key-collecting treasure grid
//!
//! This crate provides:
//! - A deterministic 6×6 grid world with keys, traps, a treasure and a
//!   shaped reward schedule
//! - An epsilon-greedy Q-learning agent with a 108-row value table and a
//!   portable model artifact
//! - A training session that drives episodes step by step, one at a time
//!   or in cancellable batches, with trailing statistics and observers
//! - The `keyquest` command-line interface

pub mod app;
pub mod cli;
pub mod error;
pub mod gridworld;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use app::AgentConfig;
pub use error::{Error, Result};
pub use gridworld::{Action, Environment, GridLayout, GridState, Position, RewardSchedule};
pub use pipeline::{
    BatchSummary, CancellationToken, EpisodeOutcome, TrailingStats, TrainingConfig,
    TrainingSession, TrainingStatistics,
};
pub use ports::{Learner, Observer};
pub use q_learning::{QLearningAgent, QTable, SavedModel};
