//! Rule extraction across a type hierarchy.
//!
//! Walks the ancestry base type first and asks the AST source for every
//! declared rule block on every type. A block defined on a more specific
//! type replaces the same-named block of its ancestors entirely. Rule ids
//! come from one counter threaded through the whole walk, so replaced
//! blocks still consume the ids they were given.

use std::collections::BTreeMap;

use bloom_ast::{render, AstNode, AstSource};
use bloom_types::{Ancestry, Catalog, DependencyEdge, Rule, RuleId};
use tracing::{debug, trace};

use crate::deps::emit_edges;
use crate::error::{CompileError, CompileResult};
use crate::validator::validate;

// ── Extraction Output ────────────────────────────────────────────────

/// Rules and edges of one rule block as defined on one type.
#[derive(Clone, Debug)]
pub struct BlockRules {
    pub block: String,
    /// Type the block was defined on.
    pub type_name: String,
    pub rules: Vec<Rule>,
    pub edges: Vec<DependencyEdge>,
    /// First id handed out for this block.
    pub first_id: RuleId,
    /// Counter value after this block.
    pub next_id: RuleId,
}

/// Result of a full extraction walk.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    /// Surviving rules in extraction order.
    pub rules: Vec<Rule>,
    pub edges: Vec<DependencyEdge>,
    /// Counter value after the walk; feed it to the next walk to keep ids
    /// unique across walks.
    pub next_id: RuleId,
}

// ── Rule Extractor ───────────────────────────────────────────────────

/// Turns rule-block trees into rules and dependency edges.
pub struct RuleExtractor<'a> {
    source: &'a dyn AstSource,
    catalog: &'a Catalog,
    log_ast: bool,
}

impl<'a> RuleExtractor<'a> {
    pub fn new(source: &'a dyn AstSource, catalog: &'a Catalog) -> Self {
        Self {
            source,
            catalog,
            log_ast: false,
        }
    }

    /// Log every accepted block tree at debug level.
    pub fn with_ast_logging(mut self, enabled: bool) -> Self {
        self.log_ast = enabled;
        self
    }

    /// Extract every declared block over the whole ancestry.
    ///
    /// Fails on the first rejected block; nothing extracted so far is
    /// returned in that case.
    pub fn extract(
        &self,
        ancestry: &Ancestry,
        blocks: &[String],
        seed: RuleId,
    ) -> CompileResult<Extraction> {
        let mut bag: BTreeMap<&str, BlockRules> = BTreeMap::new();
        let mut next = seed;

        for type_name in ancestry.iter() {
            for block in blocks {
                if let Some(found) = self.rewrite_block(type_name, block, next)? {
                    next = found.next_id;
                    if let Some(replaced) = bag.insert(block.as_str(), found) {
                        debug!(
                            block = %block,
                            overridden = %replaced.type_name,
                            by = %type_name,
                            "Rule block overridden"
                        );
                    }
                }
            }
        }

        let mut survivors: Vec<BlockRules> = bag.into_values().collect();
        survivors.sort_by_key(|b| b.first_id);

        let mut extraction = Extraction {
            next_id: next,
            ..Extraction::default()
        };
        for block in survivors {
            extraction.rules.extend(block.rules);
            extraction.edges.extend(block.edges);
        }
        Ok(extraction)
    }

    /// Extract one block as defined directly on `type_name`.
    ///
    /// Returns `Ok(None)` when the type does not define the block.
    pub fn rewrite_block(
        &self,
        type_name: &str,
        block: &str,
        seed: RuleId,
    ) -> CompileResult<Option<BlockRules>> {
        let Some(ast) = self.source.block_ast(type_name, block) else {
            trace!(type_name, block, "Block not defined on type");
            return Ok(None);
        };

        let validated = validate(&ast, self.catalog).map_err(|v| CompileError::Grammar {
            block: block.to_string(),
            reason: v.reason(),
            code: render(&v.node).unwrap_or_default(),
        })?;

        if self.log_ast {
            debug!(type_name, block, ast = ?ast, "Accepted rule block");
        }

        let mut next = seed;
        let mut rules = Vec::with_capacity(validated.statements.len());
        let mut edges = Vec::new();
        for stmt in &validated.statements {
            let source_text = render_rule(block, stmt.node)?;
            edges.extend(emit_edges(
                next,
                stmt.target,
                stmt.operator,
                stmt.body,
                self.catalog,
            ));
            rules.push(Rule {
                id: next,
                block: block.to_string(),
                target: stmt.target.to_string(),
                operator: stmt.operator,
                source_text,
            });
            next = next.next();
        }

        debug!(
            type_name,
            block,
            rules = rules.len(),
            edges = edges.len(),
            "Rule block extracted"
        );

        Ok(Some(BlockRules {
            block: block.to_string(),
            type_name: type_name.to_string(),
            rules,
            edges,
            first_id: seed,
            next_id: next,
        }))
    }
}

fn render_rule(block: &str, node: &AstNode) -> CompileResult<String> {
    render(node).map_err(|e| CompileError::Grammar {
        block: block.to_string(),
        reason: e.to_string(),
        code: String::new(),
    })
}
