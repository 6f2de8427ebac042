//! Tabular Q-learning for the subtraction game
//!
//! The update is an averaging variant of Q-learning. Instead of the
//! textbook `max` over successor actions, the successor state's values are
//! averaged, and there is no learning rate or discount factor:
//!
//! | Case | Update |
//! |------|--------|
//! | Terminal | `Q(s,a) = r` |
//! | Otherwise | `Q(s,a) = r + mean_a' Q(s',a')` |
//!
//! ## Usage Example
//!
//! ```
//! use qnim::{app::GameConfig, nim::Game, q_learning::QLearner};
//!
//! let config = GameConfig::default();
//! let mut game = Game::new(&config)?;
//! let mut learner = QLearner::new(&config)?;
//!
//! let state = game.state();
//! let action = learner.get_move(state)?;
//! game.remove(action);
//! learner.learn(state, action, game.state(), 0.0, game.is_over())?;
//! # Ok::<(), qnim::Error>(())
//! ```

pub mod agent;
pub mod q_table;

pub use agent::QLearner;
pub use q_table::QTable;
