//! Plan preview rendering.
//!
//! Hosts show a plan before anything is applied; the renderer here produces
//! the plain-text form of that preview: one aligned `old -> new` row per
//! node with its status, then a totals line. Output is deterministic so it
//! can be pinned by snapshot tests and diffed between runs.

use std::fmt::Write as _;

use namekit_engine::{ConflictKind, PlanStatus, RenamePlan};

/// Render a plan as an aligned preview table.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use namekit::{Pipeline, NameToken, Rule};
/// use namekit::render_plan;
///
/// let pipeline = Pipeline::new(vec![Rule::Replace {
///     pattern: "arm".into(),
///     replacement: "hand".into(),
///     use_regex: false,
///     match_case: true,
/// }]).unwrap();
/// let nodes = vec![NameToken::new(1, "arm")];
/// let plan = pipeline.run(&nodes, &BTreeSet::new()).unwrap();
/// assert!(render_plan(&plan).contains("arm -> hand"));
/// ```
#[must_use]
pub fn render_plan(plan: &RenamePlan) -> String {
    let old_width = plan
        .entries
        .iter()
        .map(|e| e.old_path.len())
        .max()
        .unwrap_or(0);
    let new_width = plan
        .entries
        .iter()
        .map(|e| e.new_path.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for entry in &plan.entries {
        let _ = writeln!(
            out,
            "{:<old_width$} -> {:<new_width$}  [{}]",
            entry.old_path,
            entry.new_path,
            status_label(&entry.status),
        );
    }
    let _ = writeln!(
        out,
        "{} entries: {} ok, {} unchanged, {} conflicts, {} invalid",
        plan.entries.len(),
        plan.ok,
        plan.unchanged,
        plan.conflicts,
        plan.invalid,
    );
    out
}

fn status_label(status: &PlanStatus) -> String {
    match status {
        PlanStatus::Unchanged => "unchanged".to_string(),
        PlanStatus::Ok => "ok".to_string(),
        PlanStatus::Conflict {
            with: ConflictKind::WithNode(id),
        } => format!("conflict: node {id}"),
        PlanStatus::Conflict {
            with: ConflictKind::External,
        } => "conflict: external".to_string(),
        PlanStatus::Invalid { reason } => format!("invalid: {reason}"),
    }
}
