//! Compiler configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for one rule compiler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Propagation rounds driven through the dependency analyzer. A bounded
    /// approximation; deep dependency chains may need more.
    pub analysis_rounds: u32,
    /// Identifier given to the first extracted rule of every compile.
    pub first_rule_id: u64,
    /// Write the stratified program to `<dump_dir>/<name>_rewritten.txt`.
    pub dump_rewrite: bool,
    pub dump_dir: PathBuf,
    /// Log every accepted rule-block AST at debug level.
    pub dump_ast: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            analysis_rounds: 3,
            first_rule_id: 0,
            dump_rewrite: false,
            dump_dir: PathBuf::from("."),
            dump_ast: false,
        }
    }
}
