//! Configuration types for games and training runs.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, nim::ActionSpace};

/// Counters on the table at the start of every game
pub const DEFAULT_INITIAL_STICKS: u32 = 10;

/// Largest number of counters a single turn may remove
pub const DEFAULT_MAX_REMOVABLE: u32 = 3;

/// Shape of the game: starting counters and legal removals.
///
/// The value table has one row per starting counter count and one column
/// per legal removal, so the learner must be built from the same config as
/// the game it plays.
///
/// # Examples
///
/// ```
/// use qnim::app::GameConfig;
///
/// let config = GameConfig::new().with_initial_sticks(21).with_max_removable(4);
/// assert_eq!(config.action_space()?.len(), 4);
/// # Ok::<(), qnim::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Starting number of counters
    pub initial_sticks: u32,
    /// Actions are `1..=max_removable`
    pub max_removable: u32,
}

impl GameConfig {
    /// Default game: 10 counters, removals of 1-3
    pub fn new() -> Self {
        Self {
            initial_sticks: DEFAULT_INITIAL_STICKS,
            max_removable: DEFAULT_MAX_REMOVABLE,
        }
    }

    /// Set the starting number of counters.
    pub fn with_initial_sticks(mut self, sticks: u32) -> Self {
        self.initial_sticks = sticks;
        self
    }

    /// Set the largest legal removal.
    pub fn with_max_removable(mut self, max_removable: u32) -> Self {
        self.max_removable = max_removable;
        self
    }

    /// Check that the configuration describes a playable game.
    pub fn validate(&self) -> Result<()> {
        if self.initial_sticks == 0 {
            return Err(Error::InvalidConfiguration {
                message: "initial sticks must be at least 1".to_string(),
            });
        }
        if self.max_removable == 0 {
            return Err(Error::EmptyActionSpace);
        }
        if self.max_removable > self.initial_sticks {
            log::warn!(
                "max removable ({}) exceeds initial sticks ({}); opening moves can overshoot",
                self.max_removable,
                self.initial_sticks
            );
        }
        Ok(())
    }

    pub fn action_space(&self) -> Result<ActionSpace> {
        ActionSpace::up_to(self.max_removable)
    }

    /// Number of rows in the value table
    pub fn num_states(&self) -> usize {
        self.initial_sticks as usize
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewards handed to the learner after each of its moves.
///
/// Defaults follow the classic trainer: taking the last counter costs -1,
/// forcing the opponent to take it is worth 0, and every other step is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardScheme {
    /// Reward when the learner takes the last counter
    pub loss: f64,
    /// Reward when the opponent takes the last counter
    pub win: f64,
    /// Reward for a move that leaves the game running
    pub step: f64,
}

impl RewardScheme {
    pub fn new(win: f64, loss: f64) -> Self {
        Self {
            loss,
            win,
            step: 0.0,
        }
    }
}

impl Default for RewardScheme {
    fn default() -> Self {
        Self::new(0.0, -1.0)
    }
}

/// Settings for a complete training run, loadable from a JSON file.
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```json
/// { "game": { "initial_sticks": 15 }, "games": 500, "seed": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub game: GameConfig,
    pub rewards: RewardScheme,
    /// Number of training games
    pub games: usize,
    /// Number of greedy games played after training, without learning
    pub validation_games: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl ExperimentConfig {
    /// Load a configuration from a JSON file
    ///
    /// The game shape is not validated here. Callers merge any overrides
    /// first and then call [`GameConfig::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {}", path.display()),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| Error::Io {
            operation: format!("create config file {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            rewards: RewardScheme::default(),
            games: 100,
            validation_games: 0,
            seed: None,
        }
    }
}
