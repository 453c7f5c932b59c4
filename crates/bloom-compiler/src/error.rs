//! Compile error types.
//!
//! Grammar violations and internal inconsistencies abort a compile.
//! Dependency cycles and underspecified dataflow never do; they are carried
//! on the compiled program's diagnostics instead.

use std::path::PathBuf;

use bloom_analysis::AnalysisError;
use thiserror::Error;

/// Errors that abort a compile.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A rule block does not have the required shape.
    #[error("{reason} in rule block \"{block}\"{}", code_excerpt(.code))]
    Grammar {
        block: String,
        reason: String,
        /// Regenerated source of the offending fragment; empty when it
        /// could not be rendered.
        code: String,
    },

    /// A collaborator broke its contract.
    #[error("Internal inconsistency: {0}")]
    Internal(String),

    /// A stratifier or analyzer failed.
    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// The program name cannot be used as a single file name.
    #[error("Program name '{0}' is not a valid dump file name")]
    DumpName(String),

    /// The diagnostic dump could not be written.
    #[error("Failed to write rewrite dump {}: {source}", .path.display())]
    Dump {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Block name, for grammar violations.
    pub fn block(&self) -> Option<&str> {
        match self {
            Self::Grammar { block, .. } => Some(block),
            _ => None,
        }
    }

    pub fn is_grammar(&self) -> bool {
        matches!(self, Self::Grammar { .. })
    }
}

fn code_excerpt(code: &str) -> String {
    if code.is_empty() {
        String::new()
    } else {
        format!("\nCode: {}", code)
    }
}

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
