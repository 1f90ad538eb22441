//! Tabular Q-learning
//!
//! The agent keeps one row of action values per discretized state. A state
//! is the agent's cell combined with how many keys it holds, capped at two:
//!
//! ```text
//! index = (row × grid_size + col) × 3 + min(keys_collected, 2)
//! ```
//!
//! so holding two keys and holding three keys look the same to the table.
//! Updates follow the one-step off-policy rule
//! `Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') − Q(s,a)]`.
//!
//! ## Usage Example
//!
//! ```no_run
//! use keyquest::{app::AgentConfig, gridworld::Environment, q_learning::QLearningAgent};
//!
//! let mut agent = QLearningAgent::new(&AgentConfig::default().with_seed(1))?;
//! let mut env = Environment::new();
//! let state = env.reset();
//! let action = agent.get_action(&state, true);
//! let next = env.step(action);
//! agent.update(&state, action, next.cumulative_reward - state.cumulative_reward, &next);
//! agent.save_model("agent.msgpack")?;
//! # Ok::<(), keyquest::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use q_table::{KEY_BUCKETS, QTable};
pub use serialization::SavedModel;
