//! # bloom-ast
//!
//! Rule-block syntax trees as seen by the Bloom rule compiler.
//!
//! A rule block arrives as a method definition:
//!
//! ```text
//! Definition "snd"
//!   └─ Scope
//!       └─ Block
//!           ├─ Call(<=)   link <= edge.map { |e| e }
//!           └─ Call(<)    pipe_chan <~ pipe
//!                └─ Call(~)  (superator tail applied to the body)
//! ```
//!
//! The trees come from an [`AstSource`]; [`render`] prints them back as
//! source text for rule listings and error excerpts.

#![deny(unsafe_code)]

pub mod error;
pub mod node;
pub mod render;
pub mod source;

// ── Re-exports ───────────────────────────────────────────────────────

pub use error::{AstError, AstResult};
pub use node::AstNode;
pub use render::render;
pub use source::{AstSource, InMemoryAstSource};
