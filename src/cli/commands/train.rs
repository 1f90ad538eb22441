//! Train command - Train a Q-learning agent on the key/treasure grid

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::{
    app::AgentConfig,
    cli::{config::HyperparameterArgs, output},
    pipeline::{
        BatchSummary, CancellationToken, JsonlObserver, LoggingObserver, MetricsObserver,
        MetricsSummary, ProgressObserver, TRAILING_WINDOW, TrailingStats, TrainingConfig,
        TrainingSession,
    },
    q_learning::QLearningAgent,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: BatchSummary,
    trailing: TrailingStats,
    metrics: MetricsSummary,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    agent: AgentConfig,
    seed: Option<u64>,
    resumed_from: Option<String>,
    learning: bool,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no filename means a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent")]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 1000)]
    pub episodes: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Resume from a previously saved model
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Output file for the trained model
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL episode traces
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional JSON file for moving-average learning curves
    #[arg(long)]
    pub curves: Option<PathBuf>,

    /// Report trailing statistics every N episodes
    #[arg(long, default_value_t = 10)]
    pub report_interval: usize,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Run episodes without learning updates
    #[arg(long, default_value_t = false)]
    pub no_learn: bool,

    #[command(flatten)]
    pub hyperparameters: HyperparameterArgs,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let agent_config = args.hyperparameters.agent_config(args.seed);
    let mut agent =
        QLearningAgent::new(&agent_config).context("invalid agent hyperparameters")?;

    if let Some(path) = &args.load {
        agent
            .load_model(path)
            .with_context(|| format!("failed to resume from {}", path.display()))?;
        info!(path = %path.display(), epsilon = agent.epsilon(), "resumed model");
    }

    let config = TrainingConfig {
        training: !args.no_learn,
        seed: args.seed,
        report_interval: args.report_interval,
    };

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut session = TrainingSession::new(config)
        .with_observer(Box::new(LoggingObserver::new()))
        .with_observer(Box::new(Arc::clone(&metrics)));
    if args.progress {
        session = session.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        session = session.with_observer(Box::new(observer));
    }

    output::print_section("Training");
    output::print_kv("Episodes", &args.episodes.to_string());
    output::print_kv("Learning rate", &agent_config.learning_rate.to_string());
    output::print_kv("Discount", &agent_config.discount_factor.to_string());
    output::print_kv("Starting epsilon", &format!("{:.4}", agent.epsilon()));

    let summary = session.run_batch(&mut agent, args.episodes, &CancellationToken::new())?;
    let trailing = session.trailing_stats(&agent);
    let total_keys = session.environment().layout().total_keys();

    output::print_section("Results");
    output::print_batch_summary(&summary, total_keys);
    output::print_trailing(&trailing);

    if let Some(path) = &args.output {
        agent
            .save_model(path)
            .with_context(|| format!("failed to save model to {}", path.display()))?;
        println!("\nModel saved to: {}", path.display());
    }

    if let Some(path) = &args.curves {
        session
            .statistics()
            .export_moving_averages(path, TRAILING_WINDOW)
            .with_context(|| format!("failed to write curves to {}", path.display()))?;
        println!("Curves saved to: {}", path.display());
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let metrics = metrics
            .lock()
            .map(|observer| observer.summary())
            .unwrap_or_else(|poisoned| poisoned.into_inner().summary());
        let file = TrainingSummaryFile {
            training: summary,
            trailing,
            metrics,
            metadata: SummaryMetadata {
                agent: agent_config,
                seed: args.seed,
                resumed_from: args.load.as_ref().map(|p| p.display().to_string()),
                learning: !args.no_learn,
            },
        };
        let writer = std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(writer, &file)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Summary saved to: {}", path.display());
    }

    Ok(())
}
