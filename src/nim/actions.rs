//! Ordered set of legal removal amounts

use crate::{Error, Result};

/// Legal removal amounts, in the order used for table columns.
///
/// The order matters: greedy selection breaks ties towards the lowest index,
/// so for `1..=3` an untrained learner always removes a single counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionSpace {
    actions: Vec<u32>,
}

impl ActionSpace {
    /// Actions `1..=max_removable`.
    pub fn up_to(max_removable: u32) -> Result<Self> {
        if max_removable == 0 {
            return Err(Error::EmptyActionSpace);
        }
        Ok(Self {
            actions: (1..=max_removable).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Action value stored at a column index
    pub fn get(&self, index: usize) -> Option<u32> {
        self.actions.get(index).copied()
    }

    /// Column index of an action value
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] if the value is not a legal removal.
    pub fn index_of(&self, action: u32) -> Result<usize> {
        self.actions
            .iter()
            .position(|&candidate| candidate == action)
            .ok_or(Error::InvalidAction { action })
    }

    pub fn contains(&self, action: u32) -> bool {
        self.actions.contains(&action)
    }

    /// Largest legal removal
    pub fn max_removable(&self) -> u32 {
        self.actions.last().copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.actions.iter().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.actions
    }
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self {
            actions: vec![1, 2, 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_to_three() {
        let space = ActionSpace::default();
        assert_eq!(space.as_slice(), &[1, 2, 3]);
        assert_eq!(space.max_removable(), 3);
    }

    #[test]
    fn test_up_to_matches_default() {
        assert_eq!(ActionSpace::up_to(3).unwrap(), ActionSpace::default());
    }

    #[test]
    fn test_up_to_zero_is_rejected() {
        assert!(matches!(
            ActionSpace::up_to(0),
            Err(Error::EmptyActionSpace)
        ));
    }

    #[test]
    fn test_index_of() {
        let space = ActionSpace::default();
        assert_eq!(space.index_of(1).unwrap(), 0);
        assert_eq!(space.index_of(3).unwrap(), 2);
        assert!(matches!(
            space.index_of(4),
            Err(Error::InvalidAction { action: 4 })
        ));
        assert!(matches!(
            space.index_of(0),
            Err(Error::InvalidAction { action: 0 })
        ));
    }
}
