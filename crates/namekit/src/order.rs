//! Safe execution ordering for plan application.
//!
//! Hosts with live-unique namespaces cannot take a plan's `Ok` entries in
//! arbitrary order: a node's target may still be held by another node of the
//! same batch, and renaming an ancestor invalidates the recorded paths of
//! everything beneath it. The ordering here renames deepest paths first and
//! breaks old↔new chains with temporary placeholder hops, so a sink that
//! executes the steps sequentially never sees a transient collision.
//!
//! Paths are snapshot-relative: a sink resolving nodes by path should apply
//! the steps against the same snapshot the plan was computed from.

use namekit_engine::{NodeId, RenamePlan};

/// One executable rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyStep {
    pub node_id: NodeId,
    pub from: String,
    pub to: String,
}

/// Compute a collision-free execution order for a plan's `Ok` entries.
///
/// Deeper paths go first (children before parents, the reverse of the
/// traversal a host typically lists); a step whose target is still held by
/// a later step's source becomes a hop through a placeholder derived from
/// the node id, with the final rename deferred to the end of the pass.
#[must_use]
pub fn apply_order(plan: &RenamePlan, separator: char) -> Vec<ApplyStep> {
    let mut entries: Vec<_> = plan.applicable().collect();
    entries.sort_by_key(|entry| {
        std::cmp::Reverse(entry.old_path.matches(separator).count())
    });

    // Multiset of paths still owned by pending steps. Duplicate old paths
    // are legal input (the engine never assumes input uniqueness).
    let mut pending: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for entry in &entries {
        *pending.entry(entry.old_path.as_str()).or_insert(0) += 1;
    }

    let mut steps = Vec::with_capacity(entries.len());
    let mut deferred = Vec::new();

    for entry in &entries {
        if let Some(count) = pending.get_mut(entry.old_path.as_str()) {
            *count -= 1;
            if *count == 0 {
                pending.remove(entry.old_path.as_str());
            }
        }

        if pending.contains_key(entry.new_path.as_str()) {
            let hop = placeholder(&entry.new_path, entry.node_id, separator);
            steps.push(ApplyStep {
                node_id: entry.node_id,
                from: entry.old_path.clone(),
                to: hop.clone(),
            });
            deferred.push(ApplyStep {
                node_id: entry.node_id,
                from: hop,
                to: entry.new_path.clone(),
            });
        } else {
            steps.push(ApplyStep {
                node_id: entry.node_id,
                from: entry.old_path.clone(),
                to: entry.new_path.clone(),
            });
        }
    }

    steps.extend(deferred);
    steps
}

/// Temporary unique name inside the target's namespace, derived from the
/// node id so repeated runs produce the same hop.
fn placeholder(target: &str, node_id: NodeId, separator: char) -> String {
    match target.rfind(separator) {
        Some(pos) => format!("{}{}__nk_tmp_{node_id}", &target[..pos], separator),
        None => format!("__nk_tmp_{node_id}"),
    }
}
