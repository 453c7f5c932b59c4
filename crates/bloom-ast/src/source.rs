//! AST sources.
//!
//! The compiler never inspects types itself. It asks an `AstSource` for the
//! syntax tree of a named rule block as defined directly on one type of the
//! program's ancestry.

use std::collections::HashMap;

use crate::error::{AstError, AstResult};
use crate::node::AstNode;

// ── AST Source Trait ─────────────────────────────────────────────────

/// Supplies rule-block syntax trees per (type, block name).
pub trait AstSource: Send + Sync {
    /// The tree of `block` as defined on `type_name`, or `None` when that
    /// type does not define the block itself.
    fn block_ast(&self, type_name: &str, block: &str) -> Option<AstNode>;

    /// Name of this source implementation.
    fn name(&self) -> &str;
}

// ── In-Memory Source ─────────────────────────────────────────────────

/// AST source backed by a map, filled by the host before compiling.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAstSource {
    blocks: HashMap<(String, String), AstNode>,
}

impl InMemoryAstSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `node` as the tree of `block` on `type_name`, unchecked.
    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        block: impl Into<String>,
        node: AstNode,
    ) -> Option<AstNode> {
        self.blocks.insert((type_name.into(), block.into()), node)
    }

    /// Store a definition under its own name.
    pub fn define(&mut self, type_name: impl Into<String>, definition: AstNode) -> AstResult<()> {
        let type_name = type_name.into();
        let block = match &definition {
            AstNode::Definition { name, .. } => name.clone(),
            other => {
                return Err(AstError::InvalidBlock {
                    type_name,
                    block: String::new(),
                    reason: format!("expected a definition, found {}", other.kind()),
                })
            }
        };
        self.insert(type_name, block, definition);
        Ok(())
    }

    /// Builder form of [`InMemoryAstSource::insert`].
    pub fn with_block(
        mut self,
        type_name: impl Into<String>,
        block: impl Into<String>,
        node: AstNode,
    ) -> Self {
        self.insert(type_name, block, node);
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl AstSource for InMemoryAstSource {
    fn block_ast(&self, type_name: &str, block: &str) -> Option<AstNode> {
        self.blocks
            .get(&(type_name.to_string(), block.to_string()))
            .cloned()
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_per_type() {
        let source = InMemoryAstSource::new().with_block(
            "Base",
            "snd",
            AstNode::rule_block("snd", vec![]),
        );
        assert!(source.block_ast("Base", "snd").is_some());
        assert!(source.block_ast("Derived", "snd").is_none());
        assert!(source.block_ast("Base", "rcv").is_none());
        assert_eq!(source.name(), "in-memory");
    }

    #[test]
    fn define_uses_definition_name() {
        let mut source = InMemoryAstSource::new();
        source.define("Base", AstNode::rule_block("done", vec![])).unwrap();
        assert!(source.block_ast("Base", "done").is_some());
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn define_rejects_non_definitions() {
        let mut source = InMemoryAstSource::new();
        let err = source.define("Base", AstNode::collection("x")).unwrap_err();
        assert!(matches!(err, AstError::InvalidBlock { .. }));
        assert!(source.is_empty());
    }

    #[test]
    fn insert_replaces_previous_tree() {
        let mut source = InMemoryAstSource::new();
        assert!(source.insert("T", "b", AstNode::rule_block("b", vec![])).is_none());
        assert!(source.insert("T", "b", AstNode::rule_block("b", vec![])).is_some());
        assert_eq!(source.len(), 1);
    }
}
