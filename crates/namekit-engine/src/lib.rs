//! # namekit-engine
//!
//! **Tier 2 (Rename Planning)**
//!
//! Rule pipeline and naming-resolution engine for batch rename plans.
//!
//! ## What belongs here
//! * Rule types and rule-set parsing
//! * Pipeline construction and rule evaluation
//! * Conflict detection over final candidates
//! * Plan types and the per-node error taxonomy
//!
//! ## Example
//! ```
//! use std::collections::BTreeSet;
//! use namekit_engine::{NameToken, Pipeline, Rule};
//!
//! let pipeline = Pipeline::new(vec![Rule::Replace {
//!     pattern: "arm".into(),
//!     replacement: "hand".into(),
//!     use_regex: false,
//!     match_case: true,
//! }])?;
//! let nodes = vec![NameToken::new(1, "arm"), NameToken::new(2, "leg")];
//! let plan = pipeline.run(&nodes, &BTreeSet::new())?;
//! assert_eq!(plan.ok, 1);
//! assert_eq!(plan.unchanged, 1);
//! # Ok::<(), namekit_engine::EngineError>(())
//! ```

mod config;
mod evaluate;
mod resolve;
mod types;

pub use config::{RuleKind, RuleRecord, RuleSetConfig};
pub use evaluate::Pipeline;
pub use types::{
    CaseMode, ConflictKind, CounterScope, CounterStyle, EngineError, InvalidReason, NameToken,
    NamespaceMode, NodeId, PlanEntry, PlanStatus, RenamePlan, Rule, DEFAULT_SEPARATOR,
};
