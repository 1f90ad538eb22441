//! keyquest CLI - Train and inspect a Q-learning agent on the key/treasure grid
//!
//! This CLI provides a unified interface for:
//! - Training agents and saving their value tables
//! - Evaluating saved agents greedily, optionally against a random baseline
//! - Stepping through a single episode as JSON lines

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "keyquest")]
#[command(version, long_about = None)]
#[command(about = "Tabular Q-learning on a key-collecting treasure grid")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent
    Train(keyquest::cli::commands::train::TrainArgs),

    /// Evaluate a trained agent
    Evaluate(keyquest::cli::commands::evaluate::EvaluateArgs),

    /// Print one greedy episode step by step
    Rollout(keyquest::cli::commands::rollout::RolloutArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    keyquest::cli::init_tracing(cli.verbose);

    match cli.command {
        Commands::Train(args) => keyquest::cli::commands::train::execute(args),
        Commands::Evaluate(args) => keyquest::cli::commands::evaluate::execute(args),
        Commands::Rollout(args) => keyquest::cli::commands::rollout::execute(args),
    }
}
