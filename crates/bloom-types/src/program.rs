//! Compile inputs and outputs.
//!
//! `ProgramSpec` is what a host hands the compiler; `CompiledProgram` is
//! what comes back: the rules, their dependency facts, the stratum
//! assignment, the stratified program and the diagnostics.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::types::{CapabilityFact, DependencyEdge, Rule, UnderspecifiedWarning};

// ── Ancestry ───────────────────────────────────────────────────────────

/// The type chain of a program, stored most-general first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ancestry {
    types: Vec<String>,
}

impl Ancestry {
    /// Build from a list ordered base type first, program type last.
    pub fn from_general_to_specific<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a list ordered program type first, base type last.
    pub fn from_specific_to_general<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut types: Vec<String> = types.into_iter().map(Into::into).collect();
        types.reverse();
        Self { types }
    }

    /// Types in override order: base definitions first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    /// The most specific type, i.e. the program's own type.
    pub fn most_specific(&self) -> Option<&str> {
        self.types.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ── Program Spec ───────────────────────────────────────────────────────

/// Everything the compiler needs to know about one program besides the
/// rule-block ASTs themselves.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProgramSpec {
    /// Name of the program's type. Names the diagnostic dump file.
    pub name: String,
    pub ancestry: Ancestry,
    pub collections: Catalog,
    /// Declared rule-block names, in declaration order.
    pub rule_blocks: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<CapabilityFact>,
}

impl ProgramSpec {
    pub fn new(name: impl Into<String>, ancestry: Ancestry, collections: Catalog) -> Self {
        Self {
            name: name.into(),
            ancestry,
            collections,
            rule_blocks: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    /// Declare a rule block. Declaring the same name twice has no effect.
    pub fn declare_block(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.rule_blocks.contains(&name) {
            self.rule_blocks.push(name);
        }
        self
    }

    pub fn with_capability(mut self, fact: CapabilityFact) -> Self {
        self.capabilities.push(fact);
        self
    }
}

// ── Stratification ─────────────────────────────────────────────────────

/// A strongly connected set of collections in the deductive dependency
/// graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyCycle {
    pub members: Vec<String>,
    /// Whether a negated edge lies inside the cycle.
    pub through_negation: bool,
}

impl std::fmt::Display for DependencyCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cycle [{}]", self.members.join(", "))?;
        if self.through_negation {
            write!(f, " through negation")?;
        }
        Ok(())
    }
}

/// Stratum number per collection, as computed by a stratifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StratumAssignment {
    pub strata: BTreeMap<String, u32>,
    /// Highest stratum used, `None` when no strata were computed.
    pub top: Option<u32>,
    pub cycles: Vec<DependencyCycle>,
}

impl StratumAssignment {
    /// Build from explicit per-collection strata; `top` is their maximum.
    pub fn from_strata<I, S>(strata: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let strata: BTreeMap<String, u32> =
            strata.into_iter().map(|(name, s)| (name.into(), s)).collect();
        let top = strata.values().copied().max();
        Self {
            strata,
            top,
            cycles: Vec::new(),
        }
    }

    pub fn stratum_of(&self, collection: &str) -> Option<u32> {
        self.strata.get(collection).copied()
    }
}

// ── Stratified Program ─────────────────────────────────────────────────

/// One evaluation-order bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StratumGroup {
    pub index: usize,
    pub rules: Vec<Rule>,
}

impl StratumGroup {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            rules: Vec::new(),
        }
    }

    /// Rendered rule texts, in extraction order.
    pub fn rendered(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.source_text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Rule groups to evaluate in index order. The last group holds every
/// temporal rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StratifiedProgram {
    pub groups: Vec<StratumGroup>,
}

impl StratifiedProgram {
    /// Allocate `count` empty groups.
    pub fn with_groups(count: usize) -> Self {
        Self {
            groups: (0..count).map(StratumGroup::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Index of the temporal group.
    pub fn temporal_index(&self) -> Option<usize> {
        self.groups.len().checked_sub(1)
    }

    pub fn group(&self, index: usize) -> Option<&StratumGroup> {
        self.groups.get(index)
    }

    /// Group index holding a rule with the given source text.
    pub fn position_of(&self, source_text: &str) -> Option<usize> {
        self.groups
            .iter()
            .find(|g| g.rules.iter().any(|r| r.source_text == source_text))
            .map(|g| g.index)
    }

    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }
}

// ── Diagnostics ────────────────────────────────────────────────────────

/// Non-fatal findings of one compile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub cycles: Vec<DependencyCycle>,
    pub underspecified: Vec<UnderspecifiedWarning>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.cycles.is_empty() && self.underspecified.is_empty()
    }
}

/// Output of one successful compile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompiledProgram {
    pub name: String,
    /// Surviving rules in extraction order.
    pub rules: Vec<Rule>,
    pub edges: Vec<DependencyEdge>,
    pub assignment: StratumAssignment,
    pub strata: StratifiedProgram,
    pub diagnostics: Diagnostics,
    /// Where the diagnostic dump was written, if one was requested.
    pub dump_path: Option<PathBuf>,
}

impl CompiledProgram {
    pub fn summary(&self) -> ProgramSummary {
        ProgramSummary {
            rules: self.rules.len(),
            edges: self.edges.len(),
            strata: self.strata.len(),
            cycles: self.diagnostics.cycles.len(),
            warnings: self.diagnostics.underspecified.len(),
        }
    }
}

/// Counts describing a compiled program.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub rules: usize,
    pub edges: usize,
    pub strata: usize,
    pub cycles: usize,
    pub warnings: usize,
}

impl std::fmt::Display for ProgramSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Program(rules={}, edges={}, strata={}, cycles={}, warnings={})",
            self.rules, self.edges, self.strata, self.cycles, self.warnings,
        )
    }
}
