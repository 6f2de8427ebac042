//! Learner port - abstraction over anything that can take a turn
//!
//! The training pipeline drives both sides of the table through this trait:
//! the Q-learner on one side, a scripted opponent on the other.

use crate::{Result, q_learning::QTable};

/// Learner trait - Unified interface for agents and opponents
///
/// # Examples
///
/// ```
/// use qnim::{Result, ports::Learner};
///
/// struct AlwaysOne;
///
/// impl Learner for AlwaysOne {
///     fn select_move(&mut self, _state: i64) -> Result<u32> {
///         Ok(1)
///     }
///
///     fn name(&self) -> &str {
///         "always-one"
///     }
/// }
/// ```
pub trait Learner: Send {
    /// Select how many counters to remove in the given state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfRangeState`] if the learner cannot
    /// handle the state index.
    fn select_move(&mut self, state: i64) -> Result<u32>;

    /// Update the learner after one of its moves.
    ///
    /// # Parameters
    ///
    /// * `state` - State before the move
    /// * `action` - Counters removed
    /// * `new_state` - State after the opponent's reply (ignored when `is_over`)
    /// * `reward` - Reward for the move
    /// * `is_over` - Whether the game ended this turn
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for scripted opponents.
    fn learn(
        &mut self,
        _state: i64,
        _action: u32,
        _new_state: i64,
        _reward: f64,
        _is_over: bool,
    ) -> Result<()> {
        Ok(())
    }

    /// Get the learner's name.
    fn name(&self) -> &str;

    /// Reset learner state to initial conditions.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Seed the learner's internal random number generator.
    ///
    /// Stateless and deterministic learners can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Value table backing the learner's decisions, if it has one.
    fn value_table(&self) -> Option<&QTable> {
        None
    }
}
