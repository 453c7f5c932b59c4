//! CLI error types

use bloom_analysis::AnalysisError;
use bloom_ast::AstError;
use bloom_compiler::CompileError;
use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid program file: {0}")]
    Program(String),

    #[error("Invalid rule block: {0}")]
    Ast(#[from] AstError),

    #[error("Invalid strata file: {0}")]
    Strata(#[from] AnalysisError),

    #[error("{0}")]
    Compile(#[from] CompileError),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
