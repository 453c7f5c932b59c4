//! Hands dependency facts to the dependency analyzer and collects its
//! findings.

use std::collections::BTreeSet;

use bloom_analysis::DependencyAnalyzer;
use bloom_types::{CapabilityFact, DependencyEdge, FlowEdge, UnderspecifiedWarning};
use tracing::warn;

/// Drives one analysis session for a fixed number of rounds.
pub struct AnalysisBridge<'a> {
    analyzer: &'a dyn DependencyAnalyzer,
    rounds: u32,
}

impl<'a> AnalysisBridge<'a> {
    pub fn new(analyzer: &'a dyn DependencyAnalyzer, rounds: u32) -> Self {
        Self { analyzer, rounds }
    }

    /// Run the analysis and return every underspecified pair found.
    pub fn run(
        &self,
        edges: &[DependencyEdge],
        capabilities: &[CapabilityFact],
    ) -> Vec<UnderspecifiedWarning> {
        let flows: Vec<FlowEdge> = edges
            .iter()
            .map(FlowEdge::from)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut session = self.analyzer.begin(&flows, capabilities);
        for _ in 0..self.rounds {
            session.tick();
        }

        let findings = session.underspecified();
        for w in &findings {
            warn!(
                source = %w.source,
                target = %w.target,
                analyzer = self.analyzer.name(),
                "Warning: underspecified dataflow"
            );
        }
        findings
    }
}
