//! # bloom-analysis
//!
//! Graph analyses run over the dependency facts a Bloom rule compile
//! produces:
//!
//! - **Stratification**: which evaluation stratum every deductively
//!   computed collection belongs to, and which collections are mutually
//!   recursive ([`Stratifier`], reference impl [`DatalogStratifier`]).
//! - **Monotonicity**: which collection pairs are joined by paths mixing
//!   temporal delivery and negation without a declared boundary
//!   ([`DependencyAnalyzer`], reference impl [`MonotonicityAnalyzer`]).
//!
//! Both are traits so a host can plug in its own implementation.

#![deny(unsafe_code)]

pub mod analyzer;
pub mod error;
pub mod stratifier;

// ── Re-exports ───────────────────────────────────────────────────────

pub use analyzer::{AnalysisSession, DependencyAnalyzer, MonotonicityAnalyzer, MonotonicitySession};
pub use error::{AnalysisError, AnalysisResult};
pub use stratifier::{DatalogStratifier, FixedStratifier, Stratifier};
