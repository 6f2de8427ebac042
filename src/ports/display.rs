//! Display port - where human-readable game reports go.

use crate::Result;

/// Sink for lines of text describing the game.
///
/// The core never writes output itself; drivers and observers report
/// through a sink so the same transcript can go to a log, a buffer, or a UI.
pub trait DisplaySink: Send {
    fn show(&mut self, text: &str) -> Result<()>;
}
