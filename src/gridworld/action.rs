//! Movement actions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Number of discrete actions available in every state
pub const ACTION_COUNT: usize = 4;

/// One-cell movement on the grid
///
/// The numeric identifiers (0=up, 1=down, 2=left, 3=right) double as the
/// column index into the value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All actions in identifier order
    pub const ALL: [Action; ACTION_COUNT] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Numeric identifier of the action
    pub fn id(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Arrow glyph used by displays
    pub fn symbol(self) -> char {
        match self {
            Action::Up => '↑',
            Action::Down => '↓',
            Action::Left => '←',
            Action::Right => '→',
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(action: usize) -> Result<Self, Self::Error> {
        Action::ALL
            .get(action)
            .copied()
            .ok_or(Error::InvalidAction { action })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
