//! Q-learning for the misère subtraction game
//!
//! This crate provides:
//! - The subtraction game: counters on a table, 1-3 removed per turn, and
//!   whoever takes the last counter loses
//! - A greedy tabular Q-learner with an averaging value update
//! - A training pipeline with scripted opponents and composable observers
//! - A command-line trainer

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod nim;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use app::{ExperimentConfig, GameConfig, RewardScheme};
pub use error::{Error, Result};
pub use nim::{ActionSpace, Game, GameOutcome, Side};
pub use q_learning::{QLearner, QTable};
