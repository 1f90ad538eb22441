//! Observer adapters for training sessions
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::statistics::{EpisodeOutcome, Termination, TrailingStats};
use crate::{
    Result,
    gridworld::{Action, GridState, Position},
    ports::Observer,
};

/// Observation of a single transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    pub step: usize,
    pub action: Action,
    pub reward: f64,
    pub position: Position,
    pub keys_collected: usize,
}

/// Complete observation of one episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    completed: u64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            completed: 0,
        }
    }

    fn message(stats: &TrailingStats) -> String {
        format!(
            "reward {:.1} success {:.1}% keys {:.2}",
            stats.average_reward,
            stats.success_rate * 100.0,
            stats.average_keys_collected
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.completed = 0;
        Ok(())
    }

    fn on_episode_end(
        &mut self,
        _episode: usize,
        _outcome: &EpisodeOutcome,
        _stats: &TrailingStats,
    ) -> Result<()> {
        self.completed += 1;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(self.completed);
        }
        Ok(())
    }

    fn on_report(&mut self, stats: &TrailingStats) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(Self::message(stats));
        }
        Ok(())
    }

    fn on_training_end(&mut self, stats: &TrailingStats) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_with_message(Self::message(stats));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks termination causes and episode lengths
pub struct MetricsObserver {
    total_episodes: usize,
    terminations: HashMap<Termination, usize>,
    episode_lengths: Vec<usize>,
    keys_picked_up: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            total_episodes: 0,
            terminations: HashMap::new(),
            episode_lengths: Vec::new(),
            keys_picked_up: 0,
        }
    }

    /// Number of episodes that ended a given way
    pub fn count(&self, termination: Termination) -> usize {
        self.terminations.get(&termination).copied().unwrap_or(0)
    }

    /// Fraction of episodes that ended a given way
    pub fn rate(&self, termination: Termination) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.count(termination) as f64 / self.total_episodes as f64
        }
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().sum::<usize>() as f64 / self.episode_lengths.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            successes: self.count(Termination::Success),
            traps: self.count(Termination::Trap),
            treasure_without_keys: self.count(Termination::TreasureWithoutKeys),
            timeouts: self.count(Termination::Timeout),
            success_rate: self.rate(Termination::Success),
            avg_episode_length: self.avg_episode_length(),
            keys_picked_up: self.keys_picked_up,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub successes: usize,
    pub traps: usize,
    pub treasure_without_keys: usize,
    pub timeouts: usize,
    pub success_rate: f64,
    pub avg_episode_length: f64,
    pub keys_picked_up: usize,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(
        &mut self,
        _episode: usize,
        outcome: &EpisodeOutcome,
        _stats: &TrailingStats,
    ) -> Result<()> {
        self.total_episodes += 1;
        *self.terminations.entry(outcome.termination).or_insert(0) += 1;
        self.episode_lengths.push(outcome.steps);
        self.keys_picked_up += outcome.keys_collected;
        Ok(())
    }
}

/// JSONL observer - Exports one JSON line per episode with its step trace
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize, _state: &GridState) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(
        &mut self,
        _episode: usize,
        action: Action,
        reward: f64,
        next_state: &GridState,
    ) -> Result<()> {
        self.current_steps.push(StepObservation {
            step: next_state.steps,
            action,
            reward,
            position: next_state.agent_pos,
            keys_collected: next_state.keys_collected(),
        });
        Ok(())
    }

    fn on_episode_end(
        &mut self,
        episode: usize,
        outcome: &EpisodeOutcome,
        _stats: &TrailingStats,
    ) -> Result<()> {
        let observation = Observation {
            episode,
            outcome: outcome.clone(),
            steps: std::mem::take(&mut self.current_steps),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}

/// Logging observer - Emits trailing statistics through `tracing`
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl LoggingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LoggingObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        info!(total_episodes, "training batch started");
        Ok(())
    }

    fn on_report(&mut self, stats: &TrailingStats) -> Result<()> {
        info!(
            episodes = stats.episodes,
            window = stats.window,
            avg_reward = stats.average_reward,
            success_rate = stats.success_rate,
            avg_keys = stats.average_keys_collected,
            perfect_rate = stats.perfect_episode_rate,
            epsilon = ?stats.epsilon,
            "training progress"
        );
        Ok(())
    }

    fn on_training_end(&mut self, stats: &TrailingStats) -> Result<()> {
        info!(
            episodes = stats.episodes,
            perfect_episodes = stats.perfect_episodes,
            "training batch finished"
        );
        Ok(())
    }
}

/// Shared observer - lets the caller read an observer after handing it to a
/// session
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        lock(self).on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize, state: &GridState) -> Result<()> {
        lock(self).on_episode_start(episode, state)
    }

    fn on_step(
        &mut self,
        episode: usize,
        action: Action,
        reward: f64,
        next_state: &GridState,
    ) -> Result<()> {
        lock(self).on_step(episode, action, reward, next_state)
    }

    fn on_episode_end(
        &mut self,
        episode: usize,
        outcome: &EpisodeOutcome,
        stats: &TrailingStats,
    ) -> Result<()> {
        lock(self).on_episode_end(episode, outcome, stats)
    }

    fn on_report(&mut self, stats: &TrailingStats) -> Result<()> {
        lock(self).on_report(stats)
    }

    fn on_training_end(&mut self, stats: &TrailingStats) -> Result<()> {
        lock(self).on_training_end(stats)
    }
}

// A poisoned observer still holds usable counters.
fn lock<O>(shared: &Mutex<O>) -> MutexGuard<'_, O> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(termination: Termination, steps: usize, keys: usize) -> EpisodeOutcome {
        EpisodeOutcome {
            episode: 0,
            total_reward: 0.0,
            success: termination == Termination::Success,
            keys_collected: keys,
            steps,
            termination,
        }
    }

    #[test]
    fn test_metrics_observer() {
        let mut observer = MetricsObserver::new();
        let stats = TrailingStats::default();

        assert_eq!(observer.rate(Termination::Success), 0.0);

        observer
            .on_episode_end(0, &outcome(Termination::Success, 12, 3), &stats)
            .unwrap();
        observer
            .on_episode_end(1, &outcome(Termination::Trap, 5, 0), &stats)
            .unwrap();
        observer
            .on_episode_end(2, &outcome(Termination::Success, 16, 3), &stats)
            .unwrap();

        let summary = observer.summary();
        assert_eq!(summary.total_episodes, 3);
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.traps, 1);
        assert_eq!(summary.timeouts, 0);
        assert_eq!(summary.keys_picked_up, 6);
        assert!((summary.success_rate - 0.666).abs() < 0.01);
        assert_eq!(summary.avg_episode_length, 11.0);
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_episode() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut observer = JsonlObserver::new(tmp.path()).unwrap();
        let mut env = crate::gridworld::Environment::new();
        let stats = TrailingStats::default();

        for episode in 0..2 {
            let state = env.reset();
            observer.on_episode_start(episode, &state).unwrap();
            let next = env.step(Action::Down);
            observer
                .on_step(episode, Action::Down, -2.0, &next)
                .unwrap();
            observer
                .on_episode_end(episode, &outcome(Termination::Timeout, 1, 0), &stats)
                .unwrap();
        }

        let contents = std::fs::read_to_string(tmp.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["episode"], 1);
        assert_eq!(parsed["steps"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["steps"][0]["reward"], -2.0);
    }

    #[test]
    fn test_shared_observer_is_readable_after_use() {
        let shared = Arc::new(Mutex::new(MetricsObserver::new()));
        let mut handle: Box<dyn Observer> = Box::new(Arc::clone(&shared));
        let stats = TrailingStats::default();

        handle
            .on_episode_end(0, &outcome(Termination::TreasureWithoutKeys, 10, 0), &stats)
            .unwrap();
        drop(handle);

        let summary = shared.lock().unwrap().summary();
        assert_eq!(summary.total_episodes, 1);
        assert_eq!(summary.treasure_without_keys, 1);
    }
}
