//! Error types

use thiserror::Error;

/// Errors raised outside the classification path.
///
/// Classification itself is total: an unmatched pose is reported as
/// [`Label::NoGestureMatched`](crate::classifier::Label::NoGestureMatched),
/// never as an error.
#[derive(Debug, Error)]
pub enum FingerspellError {
    /// A hand arrived with the wrong number of landmarks
    #[error("Malformed landmark frame: expected {expected} points, got {actual}")]
    MalformedFrame { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not find config directory")]
    NoConfigDir,

    #[error("Failed to spawn recognizer thread: {0}")]
    WorkerSpawn(String),
}

pub type Result<T> = std::result::Result<T, FingerspellError>;
