//! Stratified program assembly.
//!
//! Places every rule into an evaluation group: deductive rules go to the
//! stratum of their target (0 when the stratifier did not map it), temporal
//! rules go to one extra group after the highest stratum.

use bloom_types::{Rule, StratifiedProgram, StratumAssignment};
use tracing::debug;

use crate::error::{CompileError, CompileResult};

/// `top` used when the stratifier reports no strata at all.
pub const DEFAULT_TOP: u32 = 1;

/// Build the grouped program. Relative order within a group follows the
/// order of `rules`.
///
/// A stratification of `collections` collections never needs more strata
/// than there are collections, so a larger `top` is rejected before any
/// group is allocated.
pub fn assemble(
    rules: &[Rule],
    assignment: &StratumAssignment,
    collections: usize,
) -> CompileResult<StratifiedProgram> {
    let top = assignment.top.unwrap_or(DEFAULT_TOP);
    let limit = u32::try_from(collections).unwrap_or(u32::MAX).max(DEFAULT_TOP);
    if top > limit {
        return Err(CompileError::Internal(format!(
            "reported top stratum {} exceeds {} declared collections",
            top, collections
        )));
    }

    if let Some((collection, stratum)) = assignment.strata.iter().find(|(_, s)| **s > top) {
        return Err(CompileError::Internal(format!(
            "collection '{}' assigned stratum {} above reported top {}",
            collection, stratum, top
        )));
    }

    let temporal = usize::try_from(top)
        .ok()
        .and_then(|t| t.checked_add(1))
        .ok_or_else(|| CompileError::Internal(format!("top stratum {} out of range", top)))?;
    let mut program = StratifiedProgram::with_groups(temporal + 1);
    for rule in rules {
        let index = if rule.operator.is_temporal() {
            temporal
        } else {
            assignment.stratum_of(&rule.target).unwrap_or(0) as usize
        };
        program.groups[index].rules.push(rule.clone());
    }

    debug!(
        groups = program.len(),
        rules = program.rule_count(),
        "Stratified program assembled"
    );
    Ok(program)
}
