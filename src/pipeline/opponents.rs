//! Scripted opponents for training and evaluation

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{Result, nim::ActionSpace, ports::Learner};

/// Random policy learner
///
/// Removes a uniformly random legal amount, whatever the state.
pub struct RandomOpponent {
    name: String,
    action_space: ActionSpace,
    rng: StdRng,
}

impl RandomOpponent {
    /// Create a new random opponent
    pub fn new(name: String, action_space: ActionSpace) -> Self {
        Self {
            name,
            action_space,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random opponent with a deterministic seed
    pub fn with_seed(name: String, action_space: ActionSpace, seed: u64) -> Self {
        Self {
            name,
            action_space,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Learner for RandomOpponent {
    fn select_move(&mut self, _state: i64) -> Result<u32> {
        let index = self.rng.random_range(0..self.action_space.len());
        self.action_space
            .get(index)
            .ok_or(crate::Error::EmptyActionSpace)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Optimal misère policy
///
/// With removals `1..=k`, the player to move loses exactly when
/// `sticks ≡ 1 (mod k + 1)`. This opponent always moves to such a count
/// when it can and otherwise takes a single counter.
pub struct OptimalOpponent {
    name: String,
    action_space: ActionSpace,
}

impl OptimalOpponent {
    pub fn new(name: String, action_space: ActionSpace) -> Self {
        Self { name, action_space }
    }

    /// Removal that leaves the opponent on a losing count, if one exists
    pub fn winning_move(&self, sticks: i64) -> Option<u32> {
        let period = i64::from(self.action_space.max_removable()) + 1;
        let take = (sticks - 1).rem_euclid(period);
        u32::try_from(take)
            .ok()
            .filter(|&take| self.action_space.contains(take))
    }
}

impl Learner for OptimalOpponent {
    fn select_move(&mut self, state: i64) -> Result<u32> {
        let sticks = state + 1;
        match self.winning_move(sticks) {
            Some(take) => Ok(take),
            None => self
                .action_space
                .get(0)
                .ok_or(crate::Error::EmptyActionSpace),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_opponent_stays_in_action_space() {
        let space = ActionSpace::default();
        let mut opponent = RandomOpponent::with_seed("Random".to_string(), space.clone(), 3);
        for state in 0..100 {
            let take = opponent.select_move(state % 10).unwrap();
            assert!(space.contains(take));
        }
    }

    #[test]
    fn test_random_opponent_is_reproducible() {
        let space = ActionSpace::default();
        let mut a = RandomOpponent::with_seed("A".to_string(), space.clone(), 42);
        let mut b = RandomOpponent::new("B".to_string(), space);
        b.set_rng_seed(42).unwrap();

        let moves_a: Vec<u32> = (0..20).map(|_| a.select_move(5).unwrap()).collect();
        let moves_b: Vec<u32> = (0..20).map(|_| b.select_move(5).unwrap()).collect();
        assert_eq!(moves_a, moves_b);
    }

    #[test]
    fn test_optimal_opponent_leaves_losing_counts() {
        let mut opponent = OptimalOpponent::new("Optimal".to_string(), ActionSpace::default());
        // sticks = state + 1
        assert_eq!(opponent.select_move(9).unwrap(), 1); // 10 -> 9
        assert_eq!(opponent.select_move(7).unwrap(), 3); // 8 -> 5
        assert_eq!(opponent.select_move(6).unwrap(), 2); // 7 -> 5
        assert_eq!(opponent.select_move(1).unwrap(), 1); // 2 -> 1
    }

    #[test]
    fn test_optimal_opponent_in_losing_position_takes_one() {
        let mut opponent = OptimalOpponent::new("Optimal".to_string(), ActionSpace::default());
        assert_eq!(opponent.winning_move(5), None);
        assert_eq!(opponent.select_move(4).unwrap(), 1);
        assert_eq!(opponent.select_move(0).unwrap(), 1);
    }
}
