//! Dataflow monotonicity analysis.
//!
//! Finds pairs of collections joined by a dependency path that mixes a
//! temporal (next-round or asynchronous) edge with a negated edge, where no
//! collection along the way is declared a synchronization boundary. Such
//! paths make the result depend on delivery order.
//!
//! The analysis is driven in rounds by the caller. Each round composes the
//! known paths with each other, so coverage grows with the round count; a
//! fixed round count is a bound, not a fixpoint guarantee.

use std::collections::{BTreeMap, BTreeSet};

use bloom_types::{CapabilityFact, FlowEdge, UnderspecifiedWarning};
use tracing::debug;

// ── Analyzer Traits ──────────────────────────────────────────────────

/// Produces analysis sessions over one set of dependency facts.
pub trait DependencyAnalyzer: Send + Sync {
    /// Load facts into a fresh session. No rounds have run yet.
    fn begin(&self, edges: &[FlowEdge], capabilities: &[CapabilityFact]) -> Box<dyn AnalysisSession>;

    /// Name of this analyzer implementation.
    fn name(&self) -> &str;
}

/// One in-progress analysis.
pub trait AnalysisSession {
    /// Run one propagation round.
    fn tick(&mut self);

    /// Findings accumulated over the rounds run so far.
    fn underspecified(&self) -> Vec<UnderspecifiedWarning>;

    /// Rounds run so far.
    fn rounds(&self) -> u32;
}

// ── Monotonicity Analyzer ────────────────────────────────────────────

/// Reference analyzer: path composition with boundary cut-off.
#[derive(Clone, Debug, Default)]
pub struct MonotonicityAnalyzer;

impl MonotonicityAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl DependencyAnalyzer for MonotonicityAnalyzer {
    fn begin(&self, edges: &[FlowEdge], capabilities: &[CapabilityFact]) -> Box<dyn AnalysisSession> {
        Box::new(MonotonicitySession::new(edges, capabilities))
    }

    fn name(&self) -> &str {
        "monotonicity"
    }
}

/// A dependency path and what it crossed on the way.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Path {
    from: String,
    to: String,
    temporal: bool,
    negated: bool,
}

impl Path {
    fn is_underspecified(&self) -> bool {
        self.temporal && self.negated
    }
}

/// Session state of [`MonotonicityAnalyzer`].
#[derive(Clone, Debug)]
pub struct MonotonicitySession {
    paths: BTreeSet<Path>,
    boundaries: BTreeSet<String>,
    findings: BTreeSet<UnderspecifiedWarning>,
    rounds: u32,
}

impl MonotonicitySession {
    pub fn new(edges: &[FlowEdge], capabilities: &[CapabilityFact]) -> Self {
        Self {
            paths: edges
                .iter()
                .map(|e| Path {
                    from: e.source.clone(),
                    to: e.target.clone(),
                    temporal: e.temporal,
                    negated: e.negated,
                })
                .collect(),
            boundaries: capabilities.iter().map(|c| c.collection.clone()).collect(),
            findings: BTreeSet::new(),
            rounds: 0,
        }
    }

    /// Number of distinct paths known so far.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }
}

impl AnalysisSession for MonotonicitySession {
    fn tick(&mut self) {
        let mut by_source: BTreeMap<&str, Vec<&Path>> = BTreeMap::new();
        for path in &self.paths {
            by_source.entry(path.from.as_str()).or_default().push(path);
        }

        let mut composed = Vec::new();
        for head in &self.paths {
            if self.boundaries.contains(&head.to) {
                continue;
            }
            if let Some(tails) = by_source.get(head.to.as_str()) {
                for tail in tails {
                    composed.push(Path {
                        from: head.from.clone(),
                        to: tail.to.clone(),
                        temporal: head.temporal || tail.temporal,
                        negated: head.negated || tail.negated,
                    });
                }
            }
        }
        self.paths.extend(composed);

        for path in self.paths.iter().filter(|p| p.is_underspecified()) {
            self.findings
                .insert(UnderspecifiedWarning::new(path.from.clone(), path.to.clone()));
        }
        self.rounds += 1;

        debug!(
            round = self.rounds,
            paths = self.paths.len(),
            findings = self.findings.len(),
            "Monotonicity round complete"
        );
    }

    fn underspecified(&self) -> Vec<UnderspecifiedWarning> {
        self.findings.iter().cloned().collect()
    }

    fn rounds(&self) -> u32 {
        self.rounds
    }
}
