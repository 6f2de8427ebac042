//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling training
//! logic to specific output formats or metrics.

use crate::{
    Result,
    nim::{GameOutcome, Side},
    pipeline::Transition,
    q_learning::QTable,
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_games)` - Once at the beginning
/// 2. For each game:
///    - `on_game_start(game_num, sticks)`
///    - `on_move(...)` - For every move by either side
///    - `on_learn(...)` - After each learner update (training only)
///    - `on_game_end(game_num, outcome)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```
/// use qnim::{nim::GameOutcome, ports::Observer};
///
/// struct CountLosses {
///     losses: usize,
/// }
///
/// impl Observer for CountLosses {
///     fn on_game_end(&mut self, _game_num: usize, outcome: GameOutcome) -> qnim::Result<()> {
///         if outcome == GameOutcome::Loss {
///             self.losses += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts, with the number of games to be played.
    fn on_training_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a game starts.
    ///
    /// * `game_num` - Index of the game (0-based)
    /// * `sticks` - Counters on the table
    fn on_game_start(&mut self, _game_num: usize, _sticks: i64) -> Result<()> {
        Ok(())
    }

    /// Called after a move has been applied to the game.
    ///
    /// * `side` - Who moved
    /// * `removed` - Counters taken
    /// * `sticks_left` - Counters remaining afterwards (may be negative)
    fn on_move(
        &mut self,
        _game_num: usize,
        _side: Side,
        _removed: u32,
        _sticks_left: i64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after the learner has been updated.
    ///
    /// `q_table` is the learner's table after the update, when it exposes one.
    fn on_learn(
        &mut self,
        _game_num: usize,
        _transition: &Transition,
        _q_table: Option<&QTable>,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when a game ends.
    fn on_game_end(&mut self, _game_num: usize, _outcome: GameOutcome) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
