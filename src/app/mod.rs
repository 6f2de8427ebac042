//! Application configuration.
//!
//! Game shape, reward scheme, and run settings live here so the core,
//! the training pipeline, and the CLI all read the same values.

pub mod config;

pub use config::{
    DEFAULT_INITIAL_STICKS, DEFAULT_MAX_REMOVABLE, ExperimentConfig, GameConfig, RewardScheme,
};
