//! Unified error types for the roster service.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for roster operations.
#[derive(Error, Debug)]
pub enum RosterError {
    /// Client-supplied data failed a required-field check.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A lookup yielded no entity.
    #[error("{0}")]
    NotFound(&'static str),

    /// Pending-import source exists but could not be read.
    #[error("failed to read {path}: {source}")]
    StorageRead {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A line of the pending-import source is not a student record.
    #[error("malformed record on line {line}: {source}")]
    MalformedRecord {
        /// 1-based line number in the source.
        line: usize,
        /// Parse failure.
        source: serde_json::Error,
    },

    /// An imported record reuses an id while duplicates are rejected.
    #[error("duplicate student id {id} on line {line}")]
    DuplicateRecord {
        /// 1-based line number in the source.
        line: usize,
        /// The colliding id.
        id: i64,
    },

    /// Appending to the durable log failed. In-memory state is already updated.
    #[error("failed to append to {path}: {source}")]
    Persistence {
        /// The durable log path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RosterError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RosterError::Validation(_) | RosterError::NotFound(_))
    }
}

/// Required-field and policy checks on incoming student data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One of id, name or courses is absent or empty.
    #[error("Missing required student data (id, name, courses)")]
    MissingFields,

    /// The id is already stored and duplicates are rejected.
    #[error("Student with id {0} already exists")]
    DuplicateId(i64),

    /// The request body is not a student object.
    #[error("Malformed student data: {0}")]
    MalformedBody(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, RosterError>;
