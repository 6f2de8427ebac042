//! In-memory display sink.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{Result, ports::DisplaySink};

/// Collects displayed lines in memory.
///
/// Clones share the same buffer, so a caller can hand one clone to an
/// observer and read the transcript back through another.
///
/// # Examples
///
/// ```
/// use qnim::{adapters::BufferDisplay, ports::DisplaySink};
///
/// let buffer = BufferDisplay::new();
/// let mut sink = buffer.clone();
/// sink.show("Sticks left: 10")?;
/// assert_eq!(buffer.lines(), vec!["Sticks left: 10".to_string()]);
/// # Ok::<(), qnim::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BufferDisplay {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line shown so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DisplaySink for BufferDisplay {
    fn show(&mut self, text: &str) -> Result<()> {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.extend(text.lines().map(str::to_string));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_text_is_split() {
        let buffer = BufferDisplay::new();
        let mut sink = buffer.clone();
        sink.show("first\nsecond").unwrap();
        sink.show("third").unwrap();
        assert_eq!(buffer.lines(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_clear() {
        let buffer = BufferDisplay::new();
        let mut sink = buffer.clone();
        sink.show("line").unwrap();
        assert!(!buffer.is_empty());
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
