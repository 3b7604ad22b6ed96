//! Domain errors for todo operations.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors an operation can report to its caller.
///
/// Validation failures are raised before any mutation, so an `Err` from an
/// operation means the store is unchanged, with the single exception of
/// [`TodoError::Persistence`]: there the in-memory state was updated but the
/// write to disk failed.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Todo with ID '{todo_id}' not found in session {session_id}")]
    NotFound { session_id: String, todo_id: String },

    #[error("Duplicate todo ID: {0}")]
    DuplicateId(String),

    #[error("Storage file {} is corrupt: {reason}", path.display())]
    StorageCorrupt { path: PathBuf, reason: String },

    /// Writing the store failed, or a result could not be encoded.
    #[error("Failed to persist todos: {0}")]
    Persistence(String),
}

pub type TodoResult<T> = Result<T, TodoError>;

/// Stable, wire-facing classification of a [`TodoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    DuplicateId,
    StorageCorrupt,
    Persistence,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::DuplicateId => "duplicate_id",
            Self::StorageCorrupt => "storage_corrupt",
            Self::Persistence => "persistence",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TodoError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::StorageCorrupt { .. } => ErrorKind::StorageCorrupt,
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl From<std::io::Error> for TodoError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
