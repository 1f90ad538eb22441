//! Episode outcome bookkeeping and trailing averages

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, gridworld::GridState};

/// Maximum number of recent episodes averaged by trailing statistics
pub const TRAILING_WINDOW: usize = 100;

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Reached the treasure holding every key
    Success,
    /// Stepped on a trap
    Trap,
    /// Reached the treasure with keys still on the board
    TreasureWithoutKeys,
    /// Ran out of steps
    Timeout,
}

impl Termination {
    /// Classify a terminal snapshot
    pub fn classify(state: &GridState) -> Self {
        if state.is_success() {
            Termination::Success
        } else if state.on_treasure() {
            Termination::TreasureWithoutKeys
        } else if state.traps.contains(&state.agent_pos) {
            Termination::Trap
        } else {
            Termination::Timeout
        }
    }
}

/// Result of one completed episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    /// 0-based index across the whole session
    pub episode: usize,
    pub total_reward: f64,
    pub success: bool,
    pub keys_collected: usize,
    pub steps: usize,
    pub termination: Termination,
}

impl EpisodeOutcome {
    /// Build the outcome from the episode's terminal snapshot
    pub fn from_final_state(episode: usize, state: &GridState) -> Self {
        Self {
            episode,
            total_reward: state.cumulative_reward,
            success: state.is_success(),
            keys_collected: state.keys_collected(),
            steps: state.steps,
            termination: Termination::classify(state),
        }
    }
}

/// Trailing averages exposed to dashboards and logs
///
/// Rates are fractions in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailingStats {
    /// Episodes recorded so far
    pub episodes: usize,
    /// Number of recent episodes the averages cover
    pub window: usize,
    pub average_reward: f64,
    pub success_rate: f64,
    pub average_keys_collected: f64,
    pub perfect_episodes: usize,
    /// Successes over every episode ever recorded
    pub perfect_episode_rate: f64,
    pub epsilon: Option<f64>,
}

/// Moving-average curves over the whole history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub window: usize,
    pub reward: Vec<f64>,
    pub success_rate: Vec<f64>,
    pub keys_collected: Vec<f64>,
}

/// Append-only per-episode history
///
/// The three sequences always have the same length; each completed episode
/// appends to all of them exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStatistics {
    rewards: Vec<f64>,
    successes: Vec<bool>,
    keys_collected: Vec<usize>,
    perfect_episodes: usize,
}

impl TrainingStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one episode's results
    pub fn record(&mut self, outcome: &EpisodeOutcome) {
        self.rewards.push(outcome.total_reward);
        self.successes.push(outcome.success);
        self.keys_collected.push(outcome.keys_collected);
        if outcome.success {
            self.perfect_episodes += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    pub fn successes(&self) -> &[bool] {
        &self.successes
    }

    pub fn keys_collected(&self) -> &[usize] {
        &self.keys_collected
    }

    pub fn perfect_episodes(&self) -> usize {
        self.perfect_episodes
    }

    /// Size of the trailing window: `min(100, episodes so far)`
    pub fn window(&self) -> usize {
        self.len().min(TRAILING_WINDOW)
    }

    pub fn average_reward(&self) -> f64 {
        let window = self.window();
        mean(self.rewards[self.len() - window..].iter().copied())
    }

    pub fn success_rate(&self) -> f64 {
        let window = self.window();
        mean(
            self.successes[self.len() - window..]
                .iter()
                .map(|&s| if s { 1.0 } else { 0.0 }),
        )
    }

    pub fn average_keys_collected(&self) -> f64 {
        let window = self.window();
        mean(
            self.keys_collected[self.len() - window..]
                .iter()
                .map(|&k| k as f64),
        )
    }

    /// Successes divided by every episode recorded, across batches
    pub fn perfect_episode_rate(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.perfect_episodes as f64 / self.len() as f64
        }
    }

    /// Snapshot of every trailing figure
    pub fn trailing(&self, epsilon: Option<f64>) -> TrailingStats {
        TrailingStats {
            episodes: self.len(),
            window: self.window(),
            average_reward: self.average_reward(),
            success_rate: self.success_rate(),
            average_keys_collected: self.average_keys_collected(),
            perfect_episodes: self.perfect_episodes,
            perfect_episode_rate: self.perfect_episode_rate(),
            epsilon,
        }
    }

    /// Full moving-average curves for plotting.
    ///
    /// Each series has one point per complete window, so it is empty while
    /// fewer than `window` episodes are recorded.
    pub fn moving_average_series(&self, window: usize) -> MovingAverages {
        let success_values: Vec<f64> = self
            .successes
            .iter()
            .map(|&s| if s { 1.0 } else { 0.0 })
            .collect();
        let key_values: Vec<f64> = self.keys_collected.iter().map(|&k| k as f64).collect();

        MovingAverages {
            window,
            reward: running_mean(&self.rewards, window),
            success_rate: running_mean(&success_values, window),
            keys_collected: running_mean(&key_values, window),
        }
    }

    /// Export the curves to a JSON file
    pub fn export_moving_averages<P: AsRef<Path>>(&self, path: P, window: usize) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &self.moving_average_series(window))?;
        Ok(())
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn running_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    let mut sum: f64 = values[..window].iter().sum();
    let mut series = Vec::with_capacity(values.len() - window + 1);
    series.push(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        series.push(sum / window as f64);
    }
    series
}

/// Summary of one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub episodes_requested: usize,
    pub episodes_run: usize,
    pub cancelled: bool,
    /// Mean reward over this batch only
    pub average_reward: f64,
    /// Success fraction over this batch only
    pub success_rate: f64,
    /// Mean keys over this batch only
    pub average_keys_collected: f64,
    /// Successes across the whole session
    pub perfect_episodes: usize,
    /// Episodes across the whole session
    pub total_episodes: usize,
    pub epsilon: Option<f64>,
}

impl BatchSummary {
    /// Summarise the outcomes of a batch
    pub fn from_outcomes(
        episodes_requested: usize,
        outcomes: &[EpisodeOutcome],
        cancelled: bool,
        statistics: &TrainingStatistics,
        epsilon: Option<f64>,
    ) -> Self {
        Self {
            episodes_requested,
            episodes_run: outcomes.len(),
            cancelled,
            average_reward: mean(outcomes.iter().map(|o| o.total_reward)),
            success_rate: mean(outcomes.iter().map(|o| if o.success { 1.0 } else { 0.0 })),
            average_keys_collected: mean(outcomes.iter().map(|o| o.keys_collected as f64)),
            perfect_episodes: statistics.perfect_episodes(),
            total_episodes: statistics.len(),
            epsilon,
        }
    }

    /// Save summary to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load summary from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let summary = serde_json::from_reader(file)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(episode: usize, reward: f64, success: bool, keys: usize) -> EpisodeOutcome {
        EpisodeOutcome {
            episode,
            total_reward: reward,
            success,
            keys_collected: keys,
            steps: 10,
            termination: if success {
                Termination::Success
            } else {
                Termination::Timeout
            },
        }
    }

    #[test]
    fn test_empty_statistics_report_zeroes() {
        let stats = TrainingStatistics::new();
        assert_eq!(stats.window(), 0);
        assert_eq!(stats.average_reward(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.perfect_episode_rate(), 0.0);
    }

    #[test]
    fn test_record_appends_to_every_sequence() {
        let mut stats = TrainingStatistics::new();
        stats.record(&outcome(0, -250.0, false, 0));
        stats.record(&outcome(1, 1044.0, true, 3));
        stats.record(&outcome(2, 45.0, false, 1));

        assert_eq!(stats.rewards(), &[-250.0, 1044.0, 45.0]);
        assert_eq!(stats.successes(), &[false, true, false]);
        assert_eq!(stats.keys_collected(), &[0, 3, 1]);
        assert_eq!(stats.window(), 3);
        assert!((stats.average_reward() - 839.0 / 3.0).abs() < 1e-9);
        assert!((stats.success_rate() - 1.0 / 3.0).abs() < 1e-12);
        assert!((stats.average_keys_collected() - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_caps_at_one_hundred() {
        let mut stats = TrainingStatistics::new();
        for i in 0..50 {
            stats.record(&outcome(i, 0.0, true, 3));
        }
        for i in 50..150 {
            stats.record(&outcome(i, 10.0, false, 1));
        }

        assert_eq!(stats.window(), 100);
        assert_eq!(stats.average_reward(), 10.0);
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.average_keys_collected(), 1.0);
        // The all-time rate still sees the early successes
        assert!((stats.perfect_episode_rate() - 50.0 / 150.0).abs() < 1e-12);

        let trailing = stats.trailing(Some(0.5));
        assert_eq!(trailing.episodes, 150);
        assert_eq!(trailing.perfect_episodes, 50);
        assert_eq!(trailing.epsilon, Some(0.5));
    }

    #[test]
    fn test_moving_average_series() {
        let mut stats = TrainingStatistics::new();
        for (i, reward) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
            stats.record(&outcome(i, reward, i % 2 == 0, i));
        }

        let curves = stats.moving_average_series(2);
        assert_eq!(curves.reward, vec![1.5, 2.5, 3.5]);
        assert_eq!(curves.success_rate, vec![0.5, 0.5, 0.5]);
        assert_eq!(curves.keys_collected, vec![0.5, 1.5, 2.5]);

        assert!(stats.moving_average_series(5).reward.is_empty());
        assert!(stats.moving_average_series(0).reward.is_empty());
    }

    #[test]
    fn test_batch_summary_uses_batch_outcomes() {
        let mut stats = TrainingStatistics::new();
        stats.record(&outcome(0, 100.0, true, 3));
        let batch = vec![outcome(1, -100.0, false, 0), outcome(2, 300.0, true, 3)];
        for o in &batch {
            stats.record(o);
        }

        let summary = BatchSummary::from_outcomes(5, &batch, true, &stats, Some(0.2));
        assert_eq!(summary.episodes_run, 2);
        assert!(summary.cancelled);
        assert_eq!(summary.average_reward, 100.0);
        assert_eq!(summary.success_rate, 0.5);
        assert_eq!(summary.average_keys_collected, 1.5);
        assert_eq!(summary.perfect_episodes, 2);
        assert_eq!(summary.total_episodes, 3);
    }
}
