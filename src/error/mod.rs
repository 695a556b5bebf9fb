//! Error types for `dbperf`.
//!
//! Every variant in the taxonomy is unrecoverable at the point of
//! detection: a failed operation aborts the current benchmark run.
//! The one deliberate exception, search expectation mismatches, is
//! not an error at all; it is surfaced as a warning by the search
//! runner (see `search::runner`).

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `dbperf` operations.
#[derive(Error, Debug)]
pub enum DbPerfError {
    // === Backend Errors ===
    /// Operation invoked before the backend was initialized.
    #[error("Backend not initialized: call initialize() first")]
    NotInitialized,

    /// Record with the specified id was not found.
    #[error("Record not found: {id}")]
    RecordNotFound { id: String },

    /// Record or field update failed schema validation.
    #[error("Invalid data: {reason}")]
    InvalidData { reason: String },

    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // === Fixture Errors ===
    /// Fixture record count disagrees with its metadata.
    #[error("Record count mismatch: expected {expected}, found {actual}")]
    RecordCountMismatch { expected: usize, actual: usize },

    /// Expected fixture file is absent.
    #[error("Fixture not found at '{path}': generate it first")]
    FixtureNotFound { path: PathBuf },

    // === Generator Errors ===
    /// Value pool size disagrees with the Zipf generator's unique count.
    #[error("Arity mismatch: pool has {actual} values, generator expects {expected}")]
    ArityMismatch { expected: usize, actual: usize },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapped anyhow error for everything without a dedicated variant.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbPerfError {
    /// Create an `InvalidData` error with a formatted reason.
    #[must_use]
    pub fn invalid_data(reason: impl Into<String>) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }

    /// Get the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

/// Result type using `DbPerfError`.
pub type Result<T> = std::result::Result<T, DbPerfError>;
