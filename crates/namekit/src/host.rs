//! Host collaborator traits and the batch-rename session.
//!
//! The engine never calls into a scene directly; a host embeds it by
//! implementing two narrow traits. `SceneSource` snapshots the nodes to
//! rename plus the names already taken outside the batch; `RenameSink`
//! executes individual renames. Everything between the two — evaluation,
//! conflict checks, apply ordering — stays pure and host-agnostic.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use namekit_engine::{EngineError, NameToken, NodeId, Pipeline, RenamePlan, Rule};

use crate::order::apply_order;

/// Error reported by a host adapter.
///
/// Hosts map their native failures (node vanished, node locked, live
/// namespace collision) into the message; the session never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Snapshot provider for the nodes being renamed.
pub trait SceneSource {
    /// Nodes to rename, in the traversal order renumbering should follow.
    fn list_nodes(&self) -> Result<Vec<NameToken>, HostError>;

    /// Full paths held by nodes outside the batch, from one consistent
    /// snapshot of the host namespace.
    fn taken_names(&self) -> Result<BTreeSet<String>, HostError>;
}

/// Rename executor for plan application.
pub trait RenameSink {
    /// Rename a single node from its current to its new full path.
    fn rename(&mut self, from: &str, to: &str) -> Result<(), HostError>;
}

/// Errors from planning against a host snapshot.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// Per-step outcome of applying a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub node_id: NodeId,
    pub from: String,
    pub to: String,
    /// Host failure message, when the step failed.
    pub error: Option<String>,
}

/// Summary of one apply pass.
///
/// Individual failures never abort the pass: the host sees the full
/// picture and decides whether to re-snapshot and re-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub outcomes: Vec<ApplyOutcome>,
    pub applied: usize,
    pub failed: usize,
}

impl ApplyReport {
    fn from_outcomes(outcomes: Vec<ApplyOutcome>) -> Self {
        let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
        let applied = outcomes.len() - failed;
        Self {
            outcomes,
            applied,
            failed,
        }
    }

    /// True when every step applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// One batch-rename interaction with a host.
///
/// ```no_run
/// use namekit::{Rule, SceneSource, Session};
/// # fn demo(scene: impl SceneSource) -> Result<(), namekit::SessionError> {
/// let session = Session::new(scene);
/// let plan = session.plan(vec![Rule::PrefixSuffix {
///     prefix: Some("L_".into()),
///     suffix: None,
/// }])?;
/// println!("{} renames, {} conflicts", plan.ok, plan.conflicts);
/// # Ok(())
/// # }
/// ```
pub struct Session<S> {
    source: S,
    separator: char,
}

impl<S: SceneSource> Session<S> {
    /// Session with the default `.` separator.
    pub fn new(source: S) -> Self {
        Self::with_separator(source, namekit_engine::DEFAULT_SEPARATOR)
    }

    /// Session with an explicit namespace separator.
    pub fn with_separator(source: S, separator: char) -> Self {
        Self { source, separator }
    }

    /// Snapshot the scene and compute a plan for the given rules.
    ///
    /// Pure apart from the snapshot read: the scene is never mutated.
    pub fn plan(&self, rules: Vec<Rule>) -> Result<RenamePlan, SessionError> {
        let pipeline = Pipeline::with_separator(rules, self.separator)?;
        let nodes = self.source.list_nodes()?;
        let taken = self.source.taken_names()?;
        Ok(pipeline.run(&nodes, &taken)?)
    }

    /// Execute a plan's `Ok` entries against a sink, in an order safe for
    /// hosts with live-unique namespaces.
    ///
    /// `Unchanged` entries are no-ops; `Conflict` and `Invalid` entries are
    /// skipped entirely. Failures are collected per step, never silently
    /// dropped and never aborting the pass.
    pub fn apply(&self, plan: &RenamePlan, sink: &mut impl RenameSink) -> ApplyReport {
        let outcomes = apply_order(plan, self.separator)
            .into_iter()
            .map(|step| {
                let error = sink.rename(&step.from, &step.to).err().map(|e| e.message);
                ApplyOutcome {
                    node_id: step.node_id,
                    from: step.from,
                    to: step.to,
                    error,
                }
            })
            .collect();
        ApplyReport::from_outcomes(outcomes)
    }
}
