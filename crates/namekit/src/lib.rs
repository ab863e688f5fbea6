//! # namekit
//!
//! Batch rename planning for hierarchical scenes.
//!
//! Rules are composed into a [`Pipeline`], run over a snapshot of node
//! names, and resolved into a [`RenamePlan`] with a per-node status —
//! nothing is renamed until a host adapter applies the plan, and nothing
//! conflicting is ever applied at all.
//!
//! The engine itself lives in `namekit-engine`; this crate re-exports it
//! and adds the host-facing surface:
//! * [`SceneSource`] / [`RenameSink`] — the two traits a host implements
//! * [`Session`] — snapshot, plan, and apply in one place
//! * [`apply_order`] — collision-free execution ordering for live hosts
//! * [`render_plan`] — the plain-text preview of a plan
//!
//! ## Example
//! ```
//! use std::collections::BTreeSet;
//! use namekit::{NameToken, Pipeline, Rule};
//!
//! let pipeline = Pipeline::new(vec![
//!     Rule::Replace {
//!         pattern: "_old".into(),
//!         replacement: String::new(),
//!         use_regex: false,
//!         match_case: true,
//!     },
//!     Rule::PrefixSuffix {
//!         prefix: Some("hero_".into()),
//!         suffix: None,
//!     },
//! ])?;
//! let nodes = vec![
//!     NameToken::new(1, "body_old"),
//!     NameToken::new(2, "cape"),
//! ];
//! let plan = pipeline.run(&nodes, &BTreeSet::new())?;
//! assert_eq!(plan.entries[0].new_path, "hero_body");
//! assert_eq!(plan.ok, 2);
//! # Ok::<(), namekit::EngineError>(())
//! ```

mod host;
mod order;
mod render;

pub use host::{
    ApplyOutcome, ApplyReport, HostError, RenameSink, SceneSource, Session, SessionError,
};
pub use order::{apply_order, ApplyStep};
pub use render::render_plan;

pub use namekit_engine::{
    CaseMode, ConflictKind, CounterScope, CounterStyle, EngineError, InvalidReason, NameToken,
    NamespaceMode, NodeId, Pipeline, PlanEntry, PlanStatus, RenamePlan, Rule, RuleKind, RuleRecord,
    RuleSetConfig, DEFAULT_SEPARATOR,
};
pub use namekit_name::{
    alpha_tail, join_path, parse_segments, split_numeric_tail, strip_numeric_tail, NameParts,
};
