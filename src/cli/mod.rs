//! CLI infrastructure for the keyquest toolkit
//!
//! This module provides the command-line interface for training,
//! evaluating and stepping through agents.

pub mod commands;
pub mod config;
pub mod output;

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` selects warn (0),
/// info (1), debug (2) or trace (3+). Calling it twice is harmless.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
