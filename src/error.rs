//! Error types for the qnim crate

use thiserror::Error;

/// Main error type for the qnim crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("state index {state} is out of range (table has {size} states)")]
    OutOfRangeState { state: i64, size: usize },

    #[error("action {action} is not in the action space")]
    InvalidAction { action: u32 },

    #[error("action space is empty (max removable must be at least 1)")]
    EmptyActionSpace,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
