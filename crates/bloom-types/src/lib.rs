//! # bloom-types
//!
//! Domain types shared by the Bloom rule compiler crates: compiled rules,
//! operators and qualifiers, dependency facts, declared collections, stratum
//! assignments, stratified programs, diagnostics and compiler configuration.
//!
//! ## Rule shapes
//!
//! ```text
//! target <=  body      deductive, recomputed every round
//! target <+  body      temporal, body qualified Persisted
//! target <-  body      temporal, body qualified Deleted
//! target <~  body      temporal, body qualified Negated
//! ```

#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod program;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────

pub use catalog::{Catalog, CollectionDecl, CollectionKind};
pub use config::CompilerConfig;
pub use program::{
    Ancestry, CompiledProgram, DependencyCycle, Diagnostics, ProgramSpec, ProgramSummary,
    StratifiedProgram, StratumAssignment, StratumGroup,
};
pub use types::{
    CapabilityFact, DependencyEdge, FlowEdge, Operator, Qualifier, Rule, RuleId, Superator,
    UnderspecifiedWarning,
};
