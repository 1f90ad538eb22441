//! Grid coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

use super::action::Action;

/// A cell on the grid, addressed as (row, column) from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan (L1) distance between two cells
    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Move one cell in the direction of `action`, staying inside a
    /// `grid_size` × `grid_size` board. Walls leave that axis unchanged.
    pub fn stepped(self, action: Action, grid_size: usize) -> Position {
        let last = grid_size.saturating_sub(1);
        match action {
            Action::Up => Position::new(self.row.saturating_sub(1), self.col),
            Action::Down => Position::new((self.row + 1).min(last), self.col),
            Action::Left => Position::new(self.row, self.col.saturating_sub(1)),
            Action::Right => Position::new(self.row, (self.col + 1).min(last)),
        }
    }

    /// Whether the cell lies on a `grid_size` × `grid_size` board
    pub fn in_bounds(self, grid_size: usize) -> bool {
        self.row < grid_size && self.col < grid_size
    }

    /// Row-major cell index (`row × grid_size + col`)
    pub fn index(self, grid_size: usize) -> usize {
        self.row * grid_size + self.col
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
