//! Model artifact for Q-learning agents.
//!
//! The artifact is a MessagePack document holding the flat value table and
//! the current epsilon. Values are written as 64-bit floats, so a save/load
//! round trip is bit exact.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::agent::QLearningAgent;
use crate::{Error, Result, gridworld::ACTION_COUNT};

/// Serializable snapshot of an agent's learned state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    pub version: u32,
    pub rows: usize,
    pub actions: usize,
    /// Row-major Q-values, `rows × actions` entries
    pub values: Vec<f64>,
    pub epsilon: f64,
}

impl SavedModel {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent) -> Self {
        let table = agent.q_table();
        Self {
            version: Self::VERSION,
            rows: table.rows(),
            actions: ACTION_COUNT,
            values: table.to_flat(),
            epsilon: agent.epsilon(),
        }
    }

    /// Check the artifact can be installed into a table with `rows` rows
    pub(crate) fn check_shape(&self, rows: usize) -> std::result::Result<(), String> {
        if self.version != Self::VERSION {
            return Err(format!(
                "unsupported model format version {} (expected {})",
                self.version,
                Self::VERSION
            ));
        }
        if self.actions != ACTION_COUNT {
            return Err(format!(
                "model has {} actions per state, expected {ACTION_COUNT}",
                self.actions
            ));
        }
        if self.rows != rows {
            return Err(format!("model has {} states, expected {rows}", self.rows));
        }
        if self.values.len() != self.rows * self.actions {
            return Err(format!(
                "model declares {}x{} values but stores {}",
                self.rows,
                self.actions,
                self.values.len()
            ));
        }
        if !self.epsilon.is_finite() || !(0.0..=1.0).contains(&self.epsilon) {
            return Err(format!("epsilon {} is outside [0, 1]", self.epsilon));
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create model file {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).map_err(|e| Error::SerializationContext {
            operation: "serialize model to MessagePack".to_string(),
            message: e.to_string(),
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush model file {}", path.display()),
            source,
        })?;

        Ok(())
    }

    /// Decode an artifact without validating its shape
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] if the file is missing or undecodable.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |reason: String| Error::ModelLoad {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).map_err(|e| load_error(e.to_string()))
    }
}
