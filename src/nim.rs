//! Subtraction game ("Nim") implementation

pub mod actions;
pub mod game;

pub use actions::ActionSpace;
pub use game::{Game, GameOutcome, Side};
