//! Token, rule, plan, and error type definitions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use namekit_name::join_path;

/// Default separator between namespace segments and the short name.
pub const DEFAULT_SEPARATOR: char = '.';

/// Errors from pipeline construction and rule-set loading.
///
/// Construction-time failures abort a run before any node is evaluated.
/// Per-node problems are never errors; they are reported inside the plan.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read rule set file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse rule set TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Renumber step must not be zero")]
    ZeroStep,

    #[error("Rule '{kind}' missing required field: {field}")]
    MissingField { kind: String, field: String },

    #[error("Invalid node id '{value}' in manual overrides")]
    InvalidNodeId { value: String },

    #[error("Manual name '{name}' contains the path separator")]
    SeparatorInName { name: String },

    #[error("Duplicate node id {0} in input set")]
    DuplicateNodeId(NodeId),
}

/// Opaque stable node identifier, assigned by the host.
///
/// Unique per node and immutable for the node's lifetime within one run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a node's identity and current name, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameToken {
    /// Host-assigned stable identifier.
    pub id: NodeId,

    /// Ordered namespace segments, outermost first. Empty means root.
    #[serde(default)]
    pub namespace: Vec<String>,

    /// The node's name within its namespace.
    pub short_name: String,
}

impl NameToken {
    /// Token for a node at the namespace root.
    pub fn new(id: u64, short_name: impl Into<String>) -> Self {
        Self {
            id: NodeId(id),
            namespace: Vec::new(),
            short_name: short_name.into(),
        }
    }

    /// Token for a namespaced node.
    pub fn with_namespace<I, S>(id: u64, namespace: I, short_name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: NodeId(id),
            namespace: namespace.into_iter().map(Into::into).collect(),
            short_name: short_name.into(),
        }
    }

    /// Full path derived from the namespace and short name.
    ///
    /// Always recomputed from its parts, never stored.
    #[must_use]
    pub fn full_path(&self, separator: char) -> String {
        join_path(&self.namespace, &self.short_name, separator)
    }
}

/// A single configured transformation, applied to every node's candidate name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Search/replace over the short name. Namespace untouched.
    Replace {
        pattern: String,
        replacement: String,
        /// Interpret `pattern` as a regular expression.
        #[serde(default)]
        use_regex: bool,
        /// Case-sensitive matching (non-matched text keeps its casing either way).
        #[serde(default = "default_true")]
        match_case: bool,
    },

    /// Wrap the current candidate. Absent sides are left untouched.
    PrefixSuffix {
        #[serde(default)]
        prefix: Option<String>,
        #[serde(default)]
        suffix: Option<String>,
    },

    /// Replace the numeric tail with a fresh counter in traversal order.
    Renumber {
        start: u32,
        step: i32,
        /// Zero-pad digit counters to this many digits (never truncates).
        padding: u32,
        #[serde(default)]
        scope: CounterScope,
        #[serde(default)]
        style: CounterStyle,
    },

    /// Edit the namespace sequence; the short name is untouched.
    Namespace { mode: NamespaceMode, value: String },

    /// Direct per-node overrides, taken verbatim and final.
    Manual { overrides: BTreeMap<NodeId, String> },

    /// Fold the whole short name's case.
    Case { mode: CaseMode },

    /// Drop characters from either end of the short name.
    Strip {
        #[serde(default)]
        from_start: usize,
        #[serde(default)]
        from_end: usize,
    },
}

pub(crate) fn default_true() -> bool {
    true
}

/// Counter sharing for [`Rule::Renumber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CounterScope {
    /// All nodes share one counter in traversal order.
    #[default]
    PerNode,
    /// The counter resets for each distinct base string.
    PerBase,
}

/// Tail rendering for [`Rule::Renumber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CounterStyle {
    /// Zero-padded digits appended directly to the base.
    #[default]
    Digits,
    /// Lowercase alpha tail (`_a`, `_b`, .., `_aa`).
    Letters,
    /// Uppercase alpha tail (`_A`, `_B`, ..).
    UpperLetters,
}

/// Namespace edit mode for [`Rule::Namespace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceMode {
    /// Replace the entire namespace sequence.
    Set,
    /// Append the value as additional innermost segments.
    Add,
    /// Strip the innermost segment, or a named segment when the value matches one.
    Remove,
}

/// Case fold mode for [`Rule::Case`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    Upper,
    Lower,
}

/// Why a candidate name was rejected per-node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// The candidate short name is empty.
    EmptyName,
    /// Stripping the numeric tail leaves no base.
    EmptyBase,
    /// A namespace segment is empty.
    EmptySegment,
    /// A namespace segment contains the path separator.
    SeparatorInSegment,
    /// The candidate short name contains the path separator.
    SeparatorInName,
    /// A renumber counter went below zero.
    NegativeCounter,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::EmptyName => write!(f, "empty short name"),
            InvalidReason::EmptyBase => write!(f, "empty base after stripping"),
            InvalidReason::EmptySegment => write!(f, "empty namespace segment"),
            InvalidReason::SeparatorInSegment => {
                write!(f, "namespace segment contains the separator")
            }
            InvalidReason::SeparatorInName => write!(f, "short name contains the separator"),
            InvalidReason::NegativeCounter => write!(f, "counter value below zero"),
        }
    }
}

/// What a conflicting candidate collides with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Another node in the batch proposes the same full path.
    WithNode(NodeId),
    /// A node outside the batch already holds the full path.
    External,
}

/// Outcome for one node in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanStatus {
    /// The candidate equals the node's original full path.
    Unchanged,
    /// A valid, unique new name.
    Ok,
    /// The candidate collides; nothing is auto-resolved.
    Conflict { with: ConflictKind },
    /// The candidate violates naming constraints and consumes no name.
    Invalid { reason: InvalidReason },
}

impl PlanStatus {
    /// True for entries an apply adapter may execute as a rename.
    #[must_use]
    pub fn is_applicable(&self) -> bool {
        matches!(self, PlanStatus::Ok)
    }
}

/// One node's old and new full path plus its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub node_id: NodeId,
    pub old_path: String,
    pub new_path: String,
    #[serde(flatten)]
    pub status: PlanStatus,
}

/// The final, validated mapping from old to new names.
///
/// Constructed fresh per run and immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    /// Per-node entries, in input traversal order.
    pub entries: Vec<PlanEntry>,

    /// Count of `Ok` entries.
    pub ok: usize,

    /// Count of `Unchanged` entries.
    pub unchanged: usize,

    /// Count of `Conflict` entries.
    pub conflicts: usize,

    /// Count of `Invalid` entries.
    pub invalid: usize,
}

impl RenamePlan {
    /// Create a plan from per-node entries.
    #[must_use]
    pub fn from_entries(entries: Vec<PlanEntry>) -> Self {
        let ok = entries
            .iter()
            .filter(|e| matches!(e.status, PlanStatus::Ok))
            .count();
        let unchanged = entries
            .iter()
            .filter(|e| matches!(e.status, PlanStatus::Unchanged))
            .count();
        let conflicts = entries
            .iter()
            .filter(|e| matches!(e.status, PlanStatus::Conflict { .. }))
            .count();
        let invalid = entries
            .iter()
            .filter(|e| matches!(e.status, PlanStatus::Invalid { .. }))
            .count();

        Self {
            entries,
            ok,
            unchanged,
            conflicts,
            invalid,
        }
    }

    /// True when every node resolved to `Ok` or `Unchanged`.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicts == 0 && self.invalid == 0
    }

    /// Entries an apply adapter should execute, in traversal order.
    pub fn applicable(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(|e| e.status.is_applicable())
    }
}
