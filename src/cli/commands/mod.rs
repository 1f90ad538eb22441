//! Subcommands of the `keyquest` binary

pub mod evaluate;
pub mod rollout;
pub mod train;
