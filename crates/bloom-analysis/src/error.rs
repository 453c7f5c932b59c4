//! Analysis error types.

use thiserror::Error;

/// Errors raised by stratifiers and dependency analyzers.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A relation row did not have the expected number of columns.
    #[error("Malformed relation '{relation}': expected {expected} columns, found {found}")]
    MalformedRelation {
        relation: String,
        expected: usize,
        found: usize,
    },

    /// A stratum value could not be interpreted.
    #[error("Invalid stratum for '{collection}': {reason}")]
    InvalidStratum { collection: String, reason: String },
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
