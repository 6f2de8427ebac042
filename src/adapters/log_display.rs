//! Display sink that writes through the `log` facade.

use crate::{Result, ports::DisplaySink};

/// Emits every line at `info` level under the `qnim::transcript` target.
///
/// Run the binary with `--verbose` or `RUST_LOG=info` to see the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl LogDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySink for LogDisplay {
    fn show(&mut self, text: &str) -> Result<()> {
        for line in text.lines() {
            log::info!(target: "qnim::transcript", "{line}");
        }
        Ok(())
    }
}
