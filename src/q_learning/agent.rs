//! Greedy Q-learning agent
//!
//! The agent keeps one [`QTable`] and never explores: every move is the
//! greedy action for the current state.

use crate::{
    Result,
    app::GameConfig,
    nim::ActionSpace,
    ports::Learner,
    q_learning::q_table::QTable,
};

/// Tabular learner for the subtraction game.
///
/// It knows nothing about the rules or the opponent. It only sees state
/// indices, the actions it took, and the rewards handed back by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct QLearner {
    q_table: QTable,
}

impl QLearner {
    /// Create a learner sized for the given game
    pub fn new(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_shape(config.num_states(), config.action_space()?))
    }

    /// Create a learner with an explicit table shape
    pub fn with_shape(num_states: usize, action_space: ActionSpace) -> Self {
        Self {
            q_table: QTable::new(num_states, action_space),
        }
    }

    /// Pick the action with the best expected value.
    ///
    /// Returns the removal amount, not its column index. Ties go to the
    /// first action in action-space order.
    pub fn get_move(&self, state: i64) -> Result<u32> {
        self.q_table.greedy_action(state)
    }

    /// Record what happened after taking `action` in `state`.
    ///
    /// * `new_state` - state after the opponent's reply; ignored when `is_over`
    /// * `reward` - reward assigned to the action
    /// * `is_over` - whether the game ended during this turn
    pub fn learn(
        &mut self,
        state: i64,
        action: u32,
        new_state: i64,
        reward: f64,
        is_over: bool,
    ) -> Result<()> {
        self.q_table
            .averaging_update(state, action, reward, new_state, is_over)
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn value(&self, state: i64, action: u32) -> Result<f64> {
        self.q_table.get(state, action)
    }

    /// Greedy removal for every state
    pub fn policy(&self) -> Result<Vec<u32>> {
        self.q_table.policy()
    }

    /// Forget everything learned so far
    pub fn reset_values(&mut self) {
        self.q_table.reset();
    }
}

impl Default for QLearner {
    fn default() -> Self {
        let config = GameConfig::default();
        Self::with_shape(config.num_states(), ActionSpace::default())
    }
}

impl Learner for QLearner {
    fn select_move(&mut self, state: i64) -> Result<u32> {
        self.get_move(state)
    }

    fn learn(
        &mut self,
        state: i64,
        action: u32,
        new_state: i64,
        reward: f64,
        is_over: bool,
    ) -> Result<()> {
        QLearner::learn(self, state, action, new_state, reward, is_over)
    }

    fn name(&self) -> &str {
        "Q-Learner"
    }

    fn reset(&mut self) -> Result<()> {
        self.reset_values();
        Ok(())
    }

    fn value_table(&self) -> Option<&QTable> {
        Some(&self.q_table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_fresh_learner_removes_one() {
        let learner = QLearner::default();
        for state in 0..10 {
            assert_eq!(learner.get_move(state).unwrap(), 1);
        }
    }

    #[test]
    fn test_get_move_out_of_range() {
        let learner = QLearner::default();
        assert!(matches!(
            learner.get_move(10),
            Err(Error::OutOfRangeState { .. })
        ));
        assert!(matches!(
            learner.get_move(-1),
            Err(Error::OutOfRangeState { .. })
        ));
    }

    #[test]
    fn test_losing_move_is_avoided() {
        let mut learner = QLearner::default();
        learner.learn(0, 1, -1, -1.0, true).unwrap();
        // Clearing both of the last two counters loses.
        learner.learn(1, 2, -1, -1.0, true).unwrap();

        assert_eq!(learner.get_move(1).unwrap(), 1);
        learner.learn(1, 1, -1, -1.0, true).unwrap();
        assert_eq!(learner.get_move(1).unwrap(), 3);
    }

    #[test]
    fn test_learn_rejects_unknown_action() {
        let mut learner = QLearner::default();
        assert!(matches!(
            learner.learn(3, 4, 1, 0.0, false),
            Err(Error::InvalidAction { action: 4 })
        ));
    }

    #[test]
    fn test_learner_port() {
        let mut learner = QLearner::default();
        let port: &mut dyn Learner = &mut learner;
        assert_eq!(port.select_move(9).unwrap(), 1);
        port.learn(9, 1, 7, 2.0, false).unwrap();
        assert_eq!(port.value_table().unwrap().get(9, 1).unwrap(), 2.0);
        port.reset().unwrap();
        assert_eq!(learner.value(9, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_policy_covers_every_state() {
        let learner = QLearner::new(&GameConfig::new().with_initial_sticks(6)).unwrap();
        assert_eq!(learner.policy().unwrap(), vec![1; 6]);
    }
}
