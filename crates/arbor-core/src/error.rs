//! Error types for the WBS engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Level;

/// Every failure the engine can report.
///
/// Invariant violations (`LevelMismatch`, `NotALeaf`, `ParentNotFound`,
/// `CycleDetected`) are detected before any write and leave the store
/// untouched. See [`WbsError::is_client_error`] for the caller-facing split
/// between rejected requests and store failures.
#[derive(Error, Debug)]
pub enum WbsError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Project not found for the given ID
    #[error("Project with ID {id} not found")]
    ProjectNotFound { id: u64 },
    /// Node not found for the given ID
    #[error("Node with ID {id} not found")]
    NodeNotFound { id: u64 },
    /// Referenced parent does not exist in the project
    #[error("Parent node {parent_id} not found in project {project_id}")]
    ParentNotFound { project_id: u64, parent_id: u64 },
    /// Requested level does not sit directly below the parent
    #[error("Level mismatch: requested {requested}, {}", describe_expected(.expected))]
    LevelMismatch {
        requested: Level,
        expected: Option<Level>,
    },
    /// Progress can only be set directly on leaves
    #[error("Node {id} has {children} child node(s); its progress is derived from them")]
    NotALeaf { id: u64, children: u32 },
    /// Sibling code/order allocation kept colliding
    #[error(
        "Concurrent modification under {} in project {project_id}: gave up after {attempts} attempt(s)",
        describe_parent(.parent_id)
    )]
    ConcurrentModification {
        project_id: u64,
        parent_id: Option<u64>,
        attempts: u32,
    },
    /// Subtree deletion did not remove exactly the expected rows
    #[error("Cascade delete of node {id} failed: expected to remove {expected} node(s), removed {removed}")]
    CascadeFailure { id: u64, expected: u64, removed: u64 },
    /// A write would make a node its own ancestor
    #[error("Node {id} cannot be placed under node {parent_id}: it would become its own ancestor")]
    CycleDetected { id: u64, parent_id: u64 },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn describe_expected(expected: &Option<Level>) -> String {
    match expected {
        Some(level) => format!("expected {level}"),
        None => "parent is already at the deepest level".to_string(),
    }
}

fn describe_parent(parent_id: &Option<u64>) -> String {
    match parent_id {
        Some(id) => format!("node {id}"),
        None => "the project root".to_string(),
    }
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> WbsError {
        WbsError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WbsError {
        WbsError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WbsError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Whether the error is a rejected request (4xx-equivalent) rather than
    /// a store or environment failure (5xx-equivalent).
    ///
    /// `ConcurrentModification` counts as a client error: nothing was
    /// written and the caller may simply resubmit.
    pub fn is_client_error(&self) -> bool {
        match self {
            WbsError::ProjectNotFound { .. }
            | WbsError::NodeNotFound { .. }
            | WbsError::ParentNotFound { .. }
            | WbsError::LevelMismatch { .. }
            | WbsError::NotALeaf { .. }
            | WbsError::ConcurrentModification { .. }
            | WbsError::CycleDetected { .. }
            | WbsError::InvalidInput { .. } => true,
            WbsError::Database { .. }
            | WbsError::CascadeFailure { .. }
            | WbsError::FileSystem { .. }
            | WbsError::XdgDirectory(_)
            | WbsError::Serialization { .. }
            | WbsError::Configuration { .. } => false,
        }
    }

    /// Whether the underlying SQLite error is a lock or uniqueness conflict
    /// that a fresh attempt may resolve.
    pub(crate) fn is_write_conflict(&self) -> bool {
        match self {
            WbsError::Database {
                source: rusqlite::Error::SqliteFailure(err, _),
                ..
            } => match err.code {
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => true,
                // CHECK, NOT NULL, foreign key and trigger failures are not
                // races and would fail the same way again.
                rusqlite::ErrorCode::ConstraintViolation => matches!(
                    err.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                ),
                _ => false,
            },
            _ => false,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WbsError::database(message).with_source(e))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, WbsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mismatch_message_names_expected_level() {
        let err = WbsError::LevelMismatch {
            requested: Level::L3,
            expected: Some(Level::L2),
        };
        let message = err.to_string();
        assert!(message.contains("requested L3"));
        assert!(message.contains("expected L2"));
    }

    #[test]
    fn test_level_mismatch_under_deepest_level() {
        let err = WbsError::LevelMismatch {
            requested: Level::L4,
            expected: None,
        };
        assert!(err.to_string().contains("deepest level"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(WbsError::NotALeaf { id: 1, children: 2 }.is_client_error());
        assert!(WbsError::invalid_input("progress")
            .with_reason("out of range")
            .is_client_error());
        assert!(!WbsError::CascadeFailure {
            id: 1,
            expected: 3,
            removed: 2
        }
        .is_client_error());
        assert!(!WbsError::database("boom")
            .with_source(rusqlite::Error::QueryReturnedNoRows)
            .is_client_error());
    }

    fn sqlite_failure(extended_code: std::os::raw::c_int) -> WbsError {
        WbsError::database("insert").with_source(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(extended_code),
            None,
        ))
    }

    #[test]
    fn test_uniqueness_and_lock_failures_are_write_conflicts() {
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE).is_write_conflict());
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY).is_write_conflict());
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_BUSY).is_write_conflict());
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_LOCKED).is_write_conflict());
        assert!(!WbsError::NodeNotFound { id: 4 }.is_write_conflict());
    }

    #[test]
    fn test_deterministic_constraint_failures_are_not_write_conflicts() {
        for code in [
            rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL,
            rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER,
        ] {
            let err = sqlite_failure(code);
            assert!(!err.is_write_conflict(), "extended code {code}");
            assert!(!err.is_client_error());
        }
    }
}
