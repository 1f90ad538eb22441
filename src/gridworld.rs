//! Key-collecting treasure grid environment

pub mod action;
pub mod environment;
pub mod layout;
pub mod position;
pub mod state;

pub use action::{ACTION_COUNT, Action};
pub use environment::Environment;
pub use layout::{GridLayout, RewardSchedule};
pub use position::Position;
pub use state::GridState;
