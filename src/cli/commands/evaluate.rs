//! Evaluate command - Run a trained agent greedily and report how it does

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{config::HyperparameterArgs, output},
    pipeline::{
        BatchSummary, CancellationToken, Learner, RandomLearner, TrainingConfig, TrainingSession,
    },
    q_learning::QLearningAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent")]
pub struct EvaluateArgs {
    /// Path to a saved model (an untrained agent is used otherwise)
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Number of evaluation episodes
    #[arg(long, short = 'e', default_value_t = 100)]
    pub episodes: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also evaluate a uniformly random baseline
    #[arg(long, default_value_t = false)]
    pub baseline: bool,
}

/// Run `episodes` episodes without learning and summarise them
pub fn evaluate_learner(
    learner: &mut dyn Learner,
    episodes: usize,
    seed: Option<u64>,
) -> Result<BatchSummary> {
    let config = TrainingConfig {
        training: false,
        seed,
        report_interval: episodes.max(1),
    };
    let mut session = TrainingSession::new(config);
    let summary = session
        .run_batch(learner, episodes, &CancellationToken::new())
        .with_context(|| format!("evaluation of {} failed", learner.name()))?;
    Ok(summary)
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let mut agent = QLearningAgent::new(&HyperparameterArgs::default().agent_config(args.seed))?;

    match &args.model {
        Some(path) => {
            println!("Loading trained agent from: {}", path.display());
            agent
                .load_model(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
        }
        None => println!("No model given; evaluating an untrained agent"),
    }

    let total_keys = crate::gridworld::GridLayout::default().total_keys();
    let summary = evaluate_learner(&mut agent, args.episodes, args.seed)?;
    output::print_section(&format!("{} (greedy)", agent.name()));
    output::print_batch_summary(&summary, total_keys);

    if args.baseline {
        let name = "Random".to_string();
        let mut baseline = match args.seed {
            Some(seed) => RandomLearner::with_seed(name, seed.wrapping_add(1)),
            None => RandomLearner::new(name),
        };
        let baseline_summary = evaluate_learner(&mut baseline, args.episodes, None)?;
        output::print_section(baseline.name());
        output::print_batch_summary(&baseline_summary, total_keys);

        output::print_section("Comparison");
        output::print_kv(
            "Reward gain",
            &format!(
                "{:+.1}",
                summary.average_reward - baseline_summary.average_reward
            ),
        );
        output::print_kv(
            "Success gain",
            &format!(
                "{:+.1} pts",
                (summary.success_rate - baseline_summary.success_rate) * 100.0
            ),
        );
    }

    Ok(())
}
