//! Adapters implementing domain ports.
//!
//! Display sinks live here: one that forwards to the `log` facade and an
//! in-memory buffer for tests and embedding.

pub mod buffer_display;
pub mod log_display;

pub use buffer_display::BufferDisplay;
pub use log_display::LogDisplay;
