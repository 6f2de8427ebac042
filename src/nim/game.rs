//! Game state for a single episode

use serde::{Deserialize, Serialize};

use super::actions::ActionSpace;
use crate::{Result, app::GameConfig};

/// Which side of the table made a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Agent,
    Opponent,
}

/// Outcome of a game, from the learning agent's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win,
    Loss,
}

impl GameOutcome {
    /// Outcome for the side that took the last counter (misère rule: it loses).
    pub fn for_last_mover(last_mover: Side) -> Self {
        match last_mover {
            Side::Agent => GameOutcome::Loss,
            Side::Opponent => GameOutcome::Win,
        }
    }
}

/// Remaining counters for one episode of the subtraction game.
///
/// `remove` does not clamp, so an overshooting removal leaves `sticks`
/// negative. [`Game::state`] then yields a negative index, which every
/// table lookup rejects with [`crate::Error::OutOfRangeState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    sticks: i64,
    initial_sticks: u32,
    action_space: ActionSpace,
}

impl Game {
    /// Create a game at its starting position
    pub fn new(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sticks: i64::from(config.initial_sticks),
            initial_sticks: config.initial_sticks,
            action_space: config.action_space()?,
        })
    }

    /// Take `count` counters off the table.
    pub fn remove(&mut self, count: u32) {
        self.sticks -= i64::from(count);
    }

    /// State index used for table lookups (`sticks - 1`).
    ///
    /// Only meaningful while the game is active.
    pub fn state(&self) -> i64 {
        self.sticks - 1
    }

    pub fn is_over(&self) -> bool {
        self.sticks <= 0
    }

    /// Restore the starting position
    pub fn reset(&mut self) {
        self.sticks = i64::from(self.initial_sticks);
    }

    pub fn sticks(&self) -> i64 {
        self.sticks
    }

    pub fn initial_sticks(&self) -> u32 {
        self.initial_sticks
    }

    pub fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }
}

impl Default for Game {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            sticks: i64::from(config.initial_sticks),
            initial_sticks: config.initial_sticks,
            action_space: ActionSpace::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_is_active() {
        let game = Game::default();
        assert_eq!(game.sticks(), 10);
        assert_eq!(game.state(), 9);
        assert!(!game.is_over());
    }

    #[test]
    fn test_remove_updates_state() {
        let mut game = Game::default();
        game.remove(3);
        assert_eq!(game.state(), 10 - 3 - 1);
        game.remove(2);
        assert_eq!(game.state(), 10 - 3 - 2 - 1);
    }

    #[test]
    fn test_exact_removal_ends_game() {
        let mut game = Game::new(&GameConfig::new().with_initial_sticks(3)).unwrap();
        game.remove(3);
        assert!(game.is_over());
        assert_eq!(game.sticks(), 0);
        assert_eq!(game.state(), -1);
    }

    #[test]
    fn test_overshoot_is_not_clamped() {
        let mut game = Game::new(&GameConfig::new().with_initial_sticks(2)).unwrap();
        game.remove(3);
        assert!(game.is_over());
        assert_eq!(game.sticks(), -1);
        assert_eq!(game.state(), -2);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut game = Game::default();
        game.remove(3);
        game.remove(3);
        game.remove(3);
        game.remove(1);
        assert!(game.is_over());

        game.reset();
        assert!(!game.is_over());
        assert_eq!(game.state(), 9);
    }

    #[test]
    fn test_misere_outcome() {
        assert_eq!(GameOutcome::for_last_mover(Side::Agent), GameOutcome::Loss);
        assert_eq!(GameOutcome::for_last_mover(Side::Opponent), GameOutcome::Win);
    }
}
