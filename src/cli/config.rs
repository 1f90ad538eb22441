//! Shared argument groups for CLI commands

use clap::Args;

use crate::app::AgentConfig;

/// Q-learning hyperparameters accepted by every command that builds an agent
#[derive(Args, Debug, Clone)]
pub struct HyperparameterArgs {
    /// Learning rate α (0.0-1.0)
    #[arg(long, default_value_t = 0.2)]
    pub learning_rate: f64,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 0.9)]
    pub discount: f64,

    /// Initial exploration rate
    #[arg(long, default_value_t = 1.0)]
    pub epsilon: f64,

    /// Epsilon decay applied after every update
    #[arg(long, default_value_t = 0.999)]
    pub epsilon_decay: f64,

    /// Exploration floor
    #[arg(long, default_value_t = 0.01)]
    pub epsilon_min: f64,
}

impl HyperparameterArgs {
    /// Build an agent configuration, seeding it when a seed is given
    pub fn agent_config(&self, seed: Option<u64>) -> AgentConfig {
        let config = AgentConfig::default()
            .with_learning_rate(self.learning_rate)
            .with_discount_factor(self.discount)
            .with_epsilon(self.epsilon)
            .with_epsilon_decay(self.epsilon_decay)
            .with_min_epsilon(self.epsilon_min);
        match seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

impl Default for HyperparameterArgs {
    fn default() -> Self {
        let defaults = AgentConfig::default();
        Self {
            learning_rate: defaults.learning_rate,
            discount: defaults.discount_factor,
            epsilon: defaults.epsilon,
            epsilon_decay: defaults.epsilon_decay,
            epsilon_min: defaults.min_epsilon,
        }
    }
}
