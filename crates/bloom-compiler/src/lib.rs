//! # bloom-compiler
//!
//! Compiles the rule blocks of a Bloom program into a stratified program.
//!
//! Rule blocks are attached to the types of a program's ancestry; a block
//! on a more specific type overrides the same-named block of its ancestors.
//! The compiler:
//!
//! 1. walks the ancestry and validates every rule block ([`validate`]);
//! 2. turns accepted statements into [`Rule`](bloom_types::Rule)s with
//!    unique, increasing ids and records which collections each rule reads;
//! 3. asks a [`Stratifier`](bloom_analysis::Stratifier) for per-collection
//!    strata and groups the rules accordingly, temporal rules last;
//! 4. runs a [`DependencyAnalyzer`](bloom_analysis::DependencyAnalyzer) over
//!    the dependency facts and reports underspecified dataflow;
//! 5. optionally writes a `<Program>_rewritten.txt` listing.
//!
//! ```text
//! AstSource ─► RuleExtractor ─► Stratifier ─► assemble ─► StratifiedProgram
//!                    │                                          │
//!                    └─► DependencyEdge ─► AnalysisBridge ─► Diagnostics
//! ```

#![deny(unsafe_code)]

pub mod assembler;
pub mod bridge;
pub mod compiler;
pub mod deps;
pub mod dump;
pub mod error;
pub mod extractor;
pub mod validator;

// ── Re-exports ───────────────────────────────────────────────────────

pub use assembler::assemble;
pub use bridge::AnalysisBridge;
pub use compiler::RuleCompiler;
pub use deps::emit_edges;
pub use dump::{dump_path, render_dump, write_dump};
pub use error::{CompileError, CompileResult};
pub use extractor::{BlockRules, Extraction, RuleExtractor};
pub use validator::{validate, GrammarViolation, RuleStatement, ValidatedBlock, ViolationKind};
