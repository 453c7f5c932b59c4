//! Core rule types for the Bloom rule compiler.
//!
//! Defines rule identifiers, operators, qualifiers, compiled rules and the
//! dependency facts recorded while rules are extracted.

use serde::{Deserialize, Serialize};

// ── Identifiers ────────────────────────────────────────────────────────

/// Identifier of one compiled rule.
///
/// Unique within a compiled program and strictly increasing in extraction
/// order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RuleId(pub u64);

impl RuleId {
    /// The identifier that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule:{}", self.0)
    }
}

// ── Operators ──────────────────────────────────────────────────────────

/// The tail of a `<`-prefixed operator.
///
/// A superator such as `<+` is tokenized as the binary `<` applied to a
/// nested unary call; the unary method name is the tail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Superator {
    /// `<~`, tail method `~`.
    Tilde,
    /// `<-`, tail method `-@`.
    Minus,
    /// `<+`, tail method `+@`.
    Plus,
}

impl Superator {
    /// Parse the unary method name found in the tail position.
    pub fn from_tail(method: &str) -> Option<Self> {
        match method {
            "~" => Some(Self::Tilde),
            "-@" => Some(Self::Minus),
            "+@" => Some(Self::Plus),
            _ => None,
        }
    }

    /// Unary method name of this tail.
    pub fn tail(&self) -> &'static str {
        match self {
            Self::Tilde => "~",
            Self::Minus => "-@",
            Self::Plus => "+@",
        }
    }

    /// Qualifier applied to the collections the rule body references.
    pub fn qualifier(&self) -> Qualifier {
        match self {
            Self::Tilde => Qualifier::Negated,
            Self::Minus => Qualifier::Deleted,
            Self::Plus => Qualifier::Persisted,
        }
    }
}

impl std::fmt::Display for Superator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tilde => write!(f, "<~"),
            Self::Minus => write!(f, "<-"),
            Self::Plus => write!(f, "<+"),
        }
    }
}

/// How a rule merges into its target collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `<=`: recomputed synchronously every evaluation round.
    Deductive,
    /// Any `<`-prefixed superator: takes effect at the next round.
    Temporal(Superator),
}

impl Operator {
    pub fn is_deductive(&self) -> bool {
        matches!(self, Self::Deductive)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Temporal(_))
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deductive => write!(f, "<="),
            Self::Temporal(s) => write!(f, "{}", s),
        }
    }
}

/// Unary modifier attached to a collection reference on a rule's
/// right-hand side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Qualifier {
    Plain,
    Negated,
    Deleted,
    Persisted,
}

impl Qualifier {
    /// Negated references are the non-monotonic ones.
    pub fn is_negated(&self) -> bool {
        matches!(self, Self::Negated)
    }
}

impl std::fmt::Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Negated => write!(f, "negated"),
            Self::Deleted => write!(f, "deleted"),
            Self::Persisted => write!(f, "persisted"),
        }
    }
}

// ── Rules ──────────────────────────────────────────────────────────────

/// One compiled rule. Created once during extraction, immutable after.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    /// Name of the rule block the rule came from.
    pub block: String,
    /// Collection the rule populates.
    pub target: String,
    pub operator: Operator,
    /// The rule rendered back to source form, for diagnostics.
    pub source_text: String,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.id, self.source_text)
    }
}

// ── Dependency Facts ───────────────────────────────────────────────────

/// A collection read by a rule, with the qualifier it was read under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    pub rule_id: RuleId,
    pub qualifier: Qualifier,
    /// Operator of the rule that produced this edge.
    pub operator: Operator,
}

impl DependencyEdge {
    pub fn is_negated(&self) -> bool {
        self.qualifier.is_negated()
    }

    pub fn is_temporal(&self) -> bool {
        self.operator.is_temporal()
    }
}

impl std::fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} ({}, {}, {})",
            self.source, self.target, self.operator, self.qualifier, self.rule_id
        )
    }
}

/// The dependency analyzer's view of an edge: direction plus the two
/// properties that matter for monotonicity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
    pub temporal: bool,
    pub negated: bool,
}

impl From<&DependencyEdge> for FlowEdge {
    fn from(edge: &DependencyEdge) -> Self {
        Self {
            source: edge.source.clone(),
            target: edge.target.clone(),
            temporal: edge.is_temporal(),
            negated: edge.is_negated(),
        }
    }
}

/// Declares a collection as a safe synchronization boundary for otherwise
/// ambiguous composition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityFact {
    pub collection: String,
}

impl CapabilityFact {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }
}

/// Two collections joined by a path that mixes temporal delivery with
/// negation and crosses no declared boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnderspecifiedWarning {
    pub source: String,
    pub target: String,
}

impl UnderspecifiedWarning {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for UnderspecifiedWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "underspecified dataflow: ({}, {})", self.source, self.target)
    }
}
