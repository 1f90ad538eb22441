//! Rollout command - Step one greedy episode and print every snapshot

use std::{
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::config::HyperparameterArgs,
    gridworld::GridState,
    pipeline::{TrainingConfig, TrainingSession},
    q_learning::QLearningAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Print a greedy episode step by step as JSON lines")]
pub struct RolloutArgs {
    /// Path to a saved model (an untrained agent is used otherwise)
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many steps even if the episode is still running
    #[arg(long)]
    pub max_steps: Option<usize>,
}

/// Drive one greedy episode and write each snapshot to `out`
///
/// The reset state is written first. Returns the last snapshot written.
pub fn rollout<W: Write>(
    agent: &mut QLearningAgent,
    seed: Option<u64>,
    max_steps: Option<usize>,
    out: &mut W,
) -> Result<GridState> {
    let config = TrainingConfig {
        training: false,
        seed,
        report_interval: 1,
    };
    let mut session = TrainingSession::new(config);

    let mut state = session.environment().state();
    serde_json::to_writer(&mut *out, &state)?;
    writeln!(out)?;

    let limit = max_steps.unwrap_or(usize::MAX);
    let mut taken = 0;
    while !state.done && taken < limit {
        let report = session.step(agent)?;
        serde_json::to_writer(&mut *out, &report.state)?;
        writeln!(out)?;
        state = report.state;
        taken += 1;
    }
    out.flush()?;
    Ok(state)
}

pub fn execute(args: RolloutArgs) -> Result<()> {
    let mut agent = QLearningAgent::new(&HyperparameterArgs::default().agent_config(args.seed))?;
    if let Some(path) = &args.model {
        agent
            .load_model(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let last = rollout(&mut agent, args.seed, args.max_steps, &mut out)?;
    drop(out);

    eprintln!(
        "steps: {}, reward: {:.1}, keys: {}/{}, success: {}",
        last.steps,
        last.cumulative_reward,
        last.keys_collected(),
        last.total_keys,
        last.is_success()
    );
    Ok(())
}
