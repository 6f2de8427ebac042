//! Dense Q-table indexed by (state, action)

use std::fmt;

use crate::{Error, Result, nim::ActionSpace};

/// Q-table mapping (state index, action) pairs to estimated values
///
/// One row per state index `0..num_states` and one column per action in the
/// action space. All values start at zero and the shape never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    /// Q-values: rows[state][action_index]
    rows: Vec<Vec<f64>>,
    action_space: ActionSpace,
}

impl QTable {
    /// Create a zero-filled Q-table
    pub fn new(num_states: usize, action_space: ActionSpace) -> Self {
        Self {
            rows: vec![vec![0.0; action_space.len()]; num_states],
            action_space,
        }
    }

    pub fn num_states(&self) -> usize {
        self.rows.len()
    }

    pub fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    /// Convert a signed state index into a row index
    fn row_index(&self, state: i64) -> Result<usize> {
        usize::try_from(state)
            .ok()
            .filter(|&row| row < self.rows.len())
            .ok_or(Error::OutOfRangeState {
                state,
                size: self.rows.len(),
            })
    }

    /// All action values for a state, in action-space order
    pub fn row(&self, state: i64) -> Result<&[f64]> {
        let row = self.row_index(state)?;
        Ok(&self.rows[row])
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: i64, action: u32) -> Result<f64> {
        let column = self.action_space.index_of(action)?;
        Ok(self.row(state)?[column])
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: i64, action: u32, value: f64) -> Result<()> {
        let column = self.action_space.index_of(action)?;
        let row = self.row_index(state)?;
        self.rows[row][column] = value;
        Ok(())
    }

    /// Average of the action values in a state
    pub fn mean(&self, state: i64) -> Result<f64> {
        let row = self.row(state)?;
        Ok(row.iter().sum::<f64>() / self.action_space.len() as f64)
    }

    /// Select greedy action (highest Q-value), ties going to the first action.
    pub fn greedy_action(&self, state: i64) -> Result<u32> {
        let row = self.row(state)?;
        let mut best = 0;
        for (index, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = index;
            }
        }
        self.action_space
            .get(best)
            .ok_or(Error::EmptyActionSpace)
    }

    /// Averaging update.
    ///
    /// Terminal: Q(s,a) ← r
    ///
    /// Otherwise: Q(s,a) ← r + (1/|A|) Σ_a' Q(s',a')
    ///
    /// There is no learning rate and no discount. Every index is validated
    /// before the table is touched, and `next_state` is ignored when `done`.
    pub fn averaging_update(
        &mut self,
        state: i64,
        action: u32,
        reward: f64,
        next_state: i64,
        done: bool,
    ) -> Result<()> {
        let column = self.action_space.index_of(action)?;
        let row = self.row_index(state)?;
        let target = if done {
            reward
        } else {
            reward + self.mean(next_state)?
        };
        self.rows[row][column] = target;
        Ok(())
    }

    /// Greedy action for every state, indexed by state
    pub fn policy(&self) -> Result<Vec<u32>> {
        (0..self.rows.len() as i64)
            .map(|state| self.greedy_action(state))
            .collect()
    }

    /// Reset all Q-values to zero
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.iter_mut().for_each(|value| *value = 0.0);
        }
    }

    /// Rows paired with their state index
    pub fn iter_rows(&self) -> impl Iterator<Item = (usize, &[f64])> {
        self.rows.iter().map(Vec::as_slice).enumerate()
    }
}

impl fmt::Display for QTable {
    /// One line per state: `sticks=N  [q1, q2, q3]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, row) in self.iter_rows() {
            let values: Vec<String> = row.iter().map(|value| format!("{value:.3}")).collect();
            writeln!(f, "sticks={:<4} [{}]", state + 1, values.join(", "))?;
        }
        Ok(())
    }
}
