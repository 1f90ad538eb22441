//! Dense Q-table indexed by discretized grid states

use crate::gridworld::{ACTION_COUNT, Action, GridState};

/// Number of collected-key buckets per cell. Counts of two or more keys
/// share the last bucket.
pub const KEY_BUCKETS: usize = 3;

/// Q-table mapping (state index, action) pairs to Q-values
///
/// One row per discretized state, one column per [`Action`]. All values
/// start at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    /// Row-major Q-values
    values: Vec<[f64; ACTION_COUNT]>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Side length of the board the rows are laid out for
    grid_size: usize,
}

impl QTable {
    /// Create a zeroed table covering every cell of a `grid_size` board
    pub fn new(grid_size: usize, learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            values: vec![[0.0; ACTION_COUNT]; grid_size * grid_size * KEY_BUCKETS],
            learning_rate,
            discount_factor,
            grid_size,
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Number of discretized states
    pub fn rows(&self) -> usize {
        self.values.len()
    }

    /// Discretize a snapshot into a row index.
    ///
    /// `cell × 3 + min(collected, 2)`, clamped to the last row.
    pub fn state_index(&self, state: &GridState) -> usize {
        let cell = state.agent_pos.index(self.grid_size);
        let bucket = state.keys_collected().min(KEY_BUCKETS - 1);
        (cell * KEY_BUCKETS + bucket).min(self.rows().saturating_sub(1))
    }

    /// Q-values of every action in a row
    pub fn row(&self, index: usize) -> &[f64; ACTION_COUNT] {
        &self.values[index]
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, index: usize, action: Action) -> f64 {
        self.values[index][action.id()]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, index: usize, action: Action, value: f64) {
        self.values[index][action.id()] = value;
    }

    /// Maximum Q-value in a row
    pub fn max_q(&self, index: usize) -> f64 {
        self.values[index]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Action with the highest Q-value; ties go to the lowest identifier
    pub fn greedy_action(&self, index: usize) -> Action {
        let row = &self.values[index];
        let mut best = 0;
        for (action, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = action;
            }
        }
        Action::ALL[best]
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The bootstrap term is applied on terminal transitions as well.
    pub fn q_learning_update(
        &mut self,
        index: usize,
        action: Action,
        reward: f64,
        next_index: usize,
    ) {
        let current_q = self.get(index, action);
        let max_next_q = self.max_q(next_index);
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.set(index, action, new_q);
    }

    /// Row-major copy of every Q-value
    pub fn to_flat(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    /// Replace every Q-value from a row-major slice.
    ///
    /// Returns `false` and leaves the table untouched when the slice length
    /// does not match `rows × ACTION_COUNT`.
    pub fn replace_from_flat(&mut self, flat: &[f64]) -> bool {
        if flat.len() != self.rows() * ACTION_COUNT {
            return false;
        }
        for (row, chunk) in self.values.iter_mut().zip(flat.chunks_exact(ACTION_COUNT)) {
            row.copy_from_slice(chunk);
        }
        true
    }

    /// Reset all Q-values to zero
    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|row| *row = [0.0; ACTION_COUNT]);
    }

    /// Number of state-action pairs whose value has moved away from zero
    pub fn visited(&self) -> usize {
        self.values.iter().flatten().filter(|v| **v != 0.0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gridworld::{Environment, Position};

    fn state_at(row: usize, col: usize, collected: usize) -> GridState {
        let mut state = Environment::new().state();
        state.agent_pos = Position::new(row, col);
        let keys: Vec<Position> = state.keys_remaining.iter().copied().collect();
        for key in keys.into_iter().take(collected) {
            state.keys_remaining.remove(&key);
            state.collected_keys.insert(key);
        }
        state
    }

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(6, 0.2, 0.9);
        assert_eq!(qtable.rows(), 108);
        assert!(qtable.to_flat().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_state_index_encoding() {
        let qtable = QTable::new(6, 0.2, 0.9);
        assert_eq!(qtable.state_index(&state_at(0, 0, 0)), 0);
        assert_eq!(qtable.state_index(&state_at(0, 1, 0)), 3);
        assert_eq!(qtable.state_index(&state_at(1, 0, 1)), 19);
        assert_eq!(qtable.state_index(&state_at(5, 5, 2)), 107);
    }

    #[test]
    fn test_three_keys_share_bucket_with_two() {
        let qtable = QTable::new(6, 0.2, 0.9);
        let two = state_at(2, 2, 2);
        let three = state_at(2, 2, 3);
        assert_eq!(qtable.state_index(&two), qtable.state_index(&three));
        assert_eq!(qtable.state_index(&three), 14 * 3 + 2);
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new(6, 0.2, 0.9);
        qtable.set(7, Action::Left, 1.5);
        assert_eq!(qtable.get(7, Action::Left), 1.5);
        assert_eq!(qtable.row(7), &[0.0, 0.0, 1.5, 0.0]);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new(6, 0.2, 0.9);
        qtable.set(4, Action::Up, -0.5);
        qtable.set(4, Action::Down, -1.5);
        qtable.set(4, Action::Left, -0.8);
        qtable.set(4, Action::Right, -0.2);
        assert_eq!(qtable.max_q(4), -0.2);
    }

    #[test]
    fn test_greedy_action_prefers_lowest_id_on_ties() {
        let mut qtable = QTable::new(6, 0.2, 0.9);
        assert_eq!(qtable.greedy_action(0), Action::Up);

        qtable.set(0, Action::Left, 2.0);
        qtable.set(0, Action::Right, 2.0);
        assert_eq!(qtable.greedy_action(0), Action::Left);

        qtable.set(0, Action::Right, 2.5);
        assert_eq!(qtable.greedy_action(0), Action::Right);
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new(6, 0.2, 0.9);
        qtable.set(10, Action::Up, 1.0);
        qtable.set(10, Action::Down, 2.0);

        qtable.q_learning_update(0, Action::Right, 3.0, 10);

        // Q(s,→) = 0 + 0.2 * (3 + 0.9 * 2 - 0) = 0.96
        assert!((qtable.get(0, Action::Right) - 0.96).abs() < 1e-12);
    }

    #[test]
    fn test_flat_replacement_checks_length() {
        let mut qtable = QTable::new(6, 0.2, 0.9);
        assert!(!qtable.replace_from_flat(&[1.0; 5]));
        assert_eq!(qtable.visited(), 0);

        let flat: Vec<f64> = (0..432).map(|i| i as f64).collect();
        assert!(qtable.replace_from_flat(&flat));
        assert_eq!(qtable.get(1, Action::Up), 4.0);
        assert_eq!(qtable.to_flat(), flat);

        qtable.reset();
        assert_eq!(qtable.visited(), 0);
    }
}
