//! Ports (trait boundaries) for external collaborators.
//!
//! These traits are owned by the domain and implemented by adapters,
//! opponents, and observers.

pub mod display;
pub mod learner;
pub mod observer;

pub use display::DisplaySink;
pub use learner::Learner;
pub use observer::Observer;
