//! Conflict detection and plan assembly.

use std::collections::{BTreeSet, HashMap};

use namekit_name::{join_path, strip_numeric_tail};

use crate::evaluate::Candidate;
use crate::types::{
    ConflictKind, InvalidReason, NameToken, PlanEntry, PlanStatus, RenamePlan,
};

/// Screen one candidate against the naming constraints.
///
/// Invalid candidates never consume a name: they are excluded from conflict
/// grouping so they cannot cause or absorb conflicts for other nodes.
fn validity(candidate: &Candidate, separator: char) -> Option<InvalidReason> {
    if let Some(reason) = candidate.invalid {
        return Some(reason);
    }
    if candidate.short_name.is_empty() {
        return Some(InvalidReason::EmptyName);
    }
    if candidate.short_name.contains(separator) {
        return Some(InvalidReason::SeparatorInName);
    }
    if strip_numeric_tail(&candidate.short_name).is_empty() {
        return Some(InvalidReason::EmptyBase);
    }
    for segment in &candidate.namespace {
        if segment.is_empty() {
            return Some(InvalidReason::EmptySegment);
        }
        if segment.contains(separator) {
            return Some(InvalidReason::SeparatorInSegment);
        }
    }
    None
}

/// Resolve final candidates into a plan.
///
/// Comparison happens once, over the full set of end-of-pipeline candidates:
/// mutual conflicts are groups of nodes proposing the same full path,
/// external conflicts collide with names held outside the batch. A singleton
/// candidate equal to the node's own original path is `Unchanged` and checks
/// against nothing else; conflicts are reported, never auto-resolved.
pub(crate) fn resolve(
    nodes: &[NameToken],
    candidates: &[Candidate],
    existing: &BTreeSet<String>,
    separator: char,
) -> RenamePlan {
    debug_assert_eq!(nodes.len(), candidates.len());

    let invalid: Vec<Option<InvalidReason>> = candidates
        .iter()
        .map(|candidate| validity(candidate, separator))
        .collect();

    let new_paths: Vec<String> = candidates
        .iter()
        .map(|candidate| join_path(&candidate.namespace, &candidate.short_name, separator))
        .collect();

    // Hash-based grouping of valid candidates by proposed full path.
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, path) in new_paths.iter().enumerate() {
        if invalid[index].is_none() {
            groups.entry(path.as_str()).or_default().push(index);
        }
    }

    let entries = nodes
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let old_path = token.full_path(separator);
            let new_path = new_paths[index].clone();

            let status = if let Some(reason) = invalid[index] {
                PlanStatus::Invalid { reason }
            } else {
                let group = &groups[new_path.as_str()];
                if group.len() > 1 {
                    // Every member conflicts, each referencing another member,
                    // including one that would have kept its own name.
                    let other = group
                        .iter()
                        .copied()
                        .find(|&member| member != index)
                        .unwrap_or(index);
                    PlanStatus::Conflict {
                        with: ConflictKind::WithNode(nodes[other].id),
                    }
                } else if new_path == old_path {
                    PlanStatus::Unchanged
                } else if existing.contains(&new_path) {
                    PlanStatus::Conflict {
                        with: ConflictKind::External,
                    }
                } else {
                    PlanStatus::Ok
                }
            };

            PlanEntry {
                node_id: token.id,
                old_path,
                new_path,
                status,
            }
        })
        .collect();

    RenamePlan::from_entries(entries)
}
