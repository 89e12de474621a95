//! Error type shared by the storage layer and the command handlers.

/// Failures that can reach a user-facing surface.
///
/// Reads never produce one of these: a missing or malformed store is treated
/// as an empty task list. Only writes and bad positional arguments do.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No task at position {0}")]
    InvalidPosition(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
