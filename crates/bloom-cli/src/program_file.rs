//! Program description files
//!
//! A program file is JSON describing the collections, the type ancestry
//! (base type first) and the rule-block trees defined on each type:
//!
//! ```json
//! {
//!   "name": "Delivery",
//!   "collections": [{"name": "pipe", "kind": "table"}],
//!   "capabilities": ["pipe"],
//!   "ancestry": [
//!     {"name": "Delivery", "blocks": {"snd": {"node": "definition", "name": "snd", "body": []}}}
//!   ]
//! }
//! ```
//!
//! `rule_blocks` may be omitted, in which case every block name defined on
//! any type is declared, in order of first appearance.

use crate::error::{CliError, CliResult};
use bloom_analysis::FixedStratifier;
use bloom_ast::{AstNode, InMemoryAstSource};
use bloom_types::{Ancestry, CapabilityFact, Catalog, ProgramSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One type of the ancestry and the rule blocks it defines itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,

    /// Rule-block trees keyed by block name, in file order
    #[serde(default, with = "ordered_blocks")]
    pub blocks: Vec<(String, AstNode)>,

    /// Rule-block definitions registered under their own names
    #[serde(default)]
    pub definitions: Vec<AstNode>,
}

/// A whole program description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramFile {
    pub name: String,

    #[serde(default)]
    pub collections: Catalog,

    /// Declared rule blocks; defaults to every block defined anywhere
    #[serde(default)]
    pub rule_blocks: Vec<String>,

    /// Collections declared as synchronization boundaries
    #[serde(default)]
    pub capabilities: Vec<String>,

    pub ancestry: Vec<TypeEntry>,
}

impl ProgramFile {
    /// Read and parse a program file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Split into the compile input and the AST source backing it.
    pub fn into_parts(self) -> CliResult<(ProgramSpec, InMemoryAstSource)> {
        if self.name.trim().is_empty() {
            return Err(CliError::Program("program name is empty".into()));
        }
        if self.ancestry.is_empty() {
            return Err(CliError::Program(format!(
                "program '{}' has an empty ancestry",
                self.name
            )));
        }

        let mut source = InMemoryAstSource::new();
        let mut defined: Vec<String> = Vec::new();
        for entry in &self.ancestry {
            for (block, node) in &entry.blocks {
                source.insert(entry.name.as_str(), block.as_str(), node.clone());
                note_block(&mut defined, block);
            }
            for definition in &entry.definitions {
                source.define(entry.name.as_str(), definition.clone())?;
                if let AstNode::Definition { name, .. } = definition {
                    note_block(&mut defined, name);
                }
            }
        }

        let blocks = if self.rule_blocks.is_empty() {
            defined
        } else {
            self.rule_blocks
        };

        let ancestry = Ancestry::from_general_to_specific(self.ancestry.into_iter().map(|t| t.name));
        let mut spec = blocks.into_iter().fold(
            ProgramSpec::new(self.name, ancestry, self.collections),
            |spec, block| spec.declare_block(block),
        );
        spec.capabilities = self
            .capabilities
            .into_iter()
            .map(CapabilityFact::new)
            .collect();

        Ok((spec, source))
    }
}

fn note_block(defined: &mut Vec<String>, block: &str) {
    if !defined.iter().any(|b| b == block) {
        defined.push(block.to_string());
    }
}

/// Serde helper keeping a JSON object's entries in the order they appear.
/// A repeated key replaces the earlier entry in place.
mod ordered_blocks {
    use bloom_ast::AstNode;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(blocks: &[(String, AstNode)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(blocks.len()))?;
        for (name, node) in blocks {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, AstNode)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(BlocksVisitor)
    }

    struct BlocksVisitor;

    impl<'de> Visitor<'de> for BlocksVisitor {
        type Value = Vec<(String, AstNode)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of block name to rule-block tree")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut blocks: Vec<(String, AstNode)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, node)) = access.next_entry::<String, AstNode>()? {
                match blocks.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(entry) => entry.1 = node,
                    None => blocks.push((name, node)),
                }
            }
            Ok(blocks)
        }
    }
}

/// Read a strata file: one `collection stratum` pair per line. Blank lines
/// and lines starting with `#` are skipped.
pub fn load_strata(path: &Path) -> CliResult<FixedStratifier> {
    let contents = std::fs::read_to_string(path)?;
    parse_strata(&contents)
}

pub fn parse_strata(contents: &str) -> CliResult<FixedStratifier> {
    let rows: Vec<Vec<&str>> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.split_whitespace().collect())
        .collect();
    Ok(FixedStratifier::from_rows(&rows)?)
}
