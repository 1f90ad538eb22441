//! Output formatting for CLI

use crate::pipeline::{BatchSummary, TrailingStats};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:24} {}", format!("{}:", key), value);
}

/// Format a fraction as a percentage
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Print the figures of one batch
pub fn print_batch_summary(summary: &BatchSummary, total_keys: usize) {
    print_kv(
        "Episodes",
        &format!("{}/{}", summary.episodes_run, summary.episodes_requested),
    );
    if summary.cancelled {
        print_kv("Status", "cancelled");
    }
    print_kv("Average reward", &format!("{:.1}", summary.average_reward));
    print_kv("Success rate", &percent(summary.success_rate));
    print_kv(
        "Average keys",
        &format!("{:.1}/{total_keys}", summary.average_keys_collected),
    );
    print_kv(
        "Perfect episodes",
        &format!("{} of {}", summary.perfect_episodes, summary.total_episodes),
    );
    if let Some(epsilon) = summary.epsilon {
        print_kv("Epsilon", &format!("{epsilon:.4}"));
    }
}

/// Print the trailing-window figures
pub fn print_trailing(stats: &TrailingStats) {
    print_kv(
        &format!("Reward (last {})", stats.window),
        &format!("{:.1}", stats.average_reward),
    );
    print_kv(
        &format!("Success (last {})", stats.window),
        &percent(stats.success_rate),
    );
    print_kv(
        &format!("Keys (last {})", stats.window),
        &format!("{:.2}", stats.average_keys_collected),
    );
    print_kv("Perfect-episode rate", &percent(stats.perfect_episode_rate));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(0.5), "50.0%");
        assert_eq!(percent(1.0 / 3.0), "33.3%");
    }
}
