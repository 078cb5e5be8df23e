//! Replay error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;

/// Result type for loading records.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error raised when the input batch cannot be turned into records.
///
/// This is the only fatal condition of a replay: it aborts before any
/// timeline starts.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The source is valid JSON but not an array of records.
    #[error("Not a record collection: {0}")]
    NotACollection(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

/// Error type for replay orchestration.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Loading the input failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Invalid replay configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A timeline player was started again after finishing.
    #[error("Player for device '{0}' has already finished")]
    PlayerFinished(String),
}

/// Non-fatal problems found in individual records.
///
/// These never abort a replay. The partitioner counts and logs them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordIssue {
    /// The record has neither device identifier alias.
    #[error("Record {index} has no device identifier")]
    MalformedRecord { index: usize },

    /// Neither timestamp field is present or well-typed; epoch zero is used.
    #[error("Record {index} has no usable timestamp, defaulting to 0")]
    UnresolvedTimestamp { index: usize },
}
