//! Stratification of the deductive dependency graph.
//!
//! A stratifier maps every collection reached by deductive rules to a
//! stratum number such that a collection read under negation is fully
//! computed in a lower stratum than its reader. Temporal rules never
//! constrain strata: their results only become visible in the next round.

use std::collections::{BTreeMap, BTreeSet};

use bloom_types::{DependencyCycle, DependencyEdge, StratumAssignment};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};

// ── Stratifier Trait ─────────────────────────────────────────────────

/// Computes per-collection strata from dependency facts.
pub trait Stratifier: Send + Sync {
    /// Assign strata and report cycles for the given dependency edges.
    fn stratify(&self, edges: &[DependencyEdge]) -> AnalysisResult<StratumAssignment>;

    /// Name of this stratifier implementation.
    fn name(&self) -> &str;
}

// ── Datalog Stratifier ───────────────────────────────────────────────

/// Classic datalog stratification over strongly connected components.
///
/// Collections in one component share a stratum. A component sits at least
/// at the stratum of every component it reads from, and strictly above any
/// component it reads under negation. A negated edge inside a component
/// cannot be honoured; the component is reported as a cycle through
/// negation and keeps the stratum its external inputs give it.
#[derive(Clone, Debug, Default)]
pub struct DatalogStratifier;

impl DatalogStratifier {
    pub fn new() -> Self {
        Self
    }
}

impl Stratifier for DatalogStratifier {
    fn stratify(&self, edges: &[DependencyEdge]) -> AnalysisResult<StratumAssignment> {
        let deductive: Vec<&DependencyEdge> =
            edges.iter().filter(|e| e.operator.is_deductive()).collect();

        let names: BTreeSet<&str> = deductive
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .collect();

        let mut graph: DiGraph<String, bool> = DiGraph::new();
        let mut index: BTreeMap<&str, NodeIndex> = BTreeMap::new();
        for &name in &names {
            index.insert(name, graph.add_node(name.to_string()));
        }
        for edge in &deductive {
            graph.add_edge(
                index[edge.source.as_str()],
                index[edge.target.as_str()],
                edge.is_negated(),
            );
        }

        // Components come back in reverse topological order.
        let components = tarjan_scc(&graph);
        let mut component_of = vec![0usize; graph.node_count()];
        for (ci, members) in components.iter().enumerate() {
            for node in members {
                component_of[node.index()] = ci;
            }
        }

        let mut component_stratum = vec![0u32; components.len()];
        for (ci, members) in components.iter().enumerate().rev() {
            let mut stratum = 0;
            for &node in members {
                for edge in graph.edges_directed(node, Direction::Incoming) {
                    let from = component_of[edge.source().index()];
                    if from == ci {
                        continue;
                    }
                    let needed = component_stratum[from] + u32::from(*edge.weight());
                    stratum = stratum.max(needed);
                }
            }
            component_stratum[ci] = stratum;
        }

        let mut cycles = Vec::new();
        for (ci, members) in components.iter().enumerate() {
            let self_loop = members.len() == 1 && graph.find_edge(members[0], members[0]).is_some();
            if members.len() < 2 && !self_loop {
                continue;
            }
            let through_negation = members.iter().any(|&node| {
                graph
                    .edges_directed(node, Direction::Outgoing)
                    .any(|e| *e.weight() && component_of[e.target().index()] == ci)
            });
            let mut names: Vec<String> = members.iter().map(|&n| graph[n].clone()).collect();
            names.sort();
            cycles.push(DependencyCycle {
                members: names,
                through_negation,
            });
        }
        cycles.sort_by(|a, b| a.members.cmp(&b.members));

        let strata: BTreeMap<String, u32> = graph
            .node_indices()
            .map(|n| (graph[n].clone(), component_stratum[component_of[n.index()]]))
            .collect();
        let top = strata.values().copied().max();

        debug!(
            collections = strata.len(),
            top = ?top,
            cycles = cycles.len(),
            "Stratification computed"
        );

        Ok(StratumAssignment {
            strata,
            top,
            cycles,
        })
    }

    fn name(&self) -> &str {
        "datalog"
    }
}

// ── Fixed Stratifier ─────────────────────────────────────────────────

/// Returns a preset assignment, for hosts that stratify elsewhere.
#[derive(Clone, Debug, Default)]
pub struct FixedStratifier {
    assignment: StratumAssignment,
}

impl FixedStratifier {
    pub fn new(assignment: StratumAssignment) -> Self {
        Self { assignment }
    }

    /// Build from `(collection, stratum)` rows. Every row must have exactly
    /// two columns and the second must be a non-negative integer.
    pub fn from_rows<R, S>(rows: &[R]) -> AnalysisResult<Self>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut strata = Vec::with_capacity(rows.len());
        for row in rows {
            let row = row.as_ref();
            if row.len() != 2 {
                return Err(AnalysisError::MalformedRelation {
                    relation: "stratum".into(),
                    expected: 2,
                    found: row.len(),
                });
            }
            let collection = row[0].as_ref();
            let stratum = row[1]
                .as_ref()
                .parse::<u32>()
                .map_err(|e| AnalysisError::InvalidStratum {
                    collection: collection.to_string(),
                    reason: e.to_string(),
                })?;
            strata.push((collection.to_string(), stratum));
        }
        Ok(Self::new(StratumAssignment::from_strata(strata)))
    }
}

impl Stratifier for FixedStratifier {
    fn stratify(&self, _edges: &[DependencyEdge]) -> AnalysisResult<StratumAssignment> {
        Ok(self.assignment.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
