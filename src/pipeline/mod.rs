//! Training orchestration
//!
//! This module provides:
//! - A session that drives episodes one step, one episode, or one batch at
//!   a time
//! - Append-only episode statistics with trailing averages
//! - Observer adapters for progress bars, metrics, JSONL traces and logs
//! - Baseline learners for comparison runs

pub mod baseline;
pub mod observers;
pub mod statistics;
pub mod training;

pub use baseline::{RandomLearner, ScriptedLearner};
pub use observers::{
    JsonlObserver, LoggingObserver, MetricsObserver, MetricsSummary, Observation,
    ProgressObserver, StepObservation,
};
pub use statistics::{
    BatchSummary, EpisodeOutcome, MovingAverages, TRAILING_WINDOW, Termination, TrailingStats,
    TrainingStatistics,
};
pub use training::{CancellationToken, StepReport, TrainingConfig, TrainingSession};

pub use crate::ports::{Learner, Observer};
