//! Rule-set configuration parsing.
//!
//! A rule set is described in TOML as an ordered list of `[[rules]]` tables
//! with a `kind` discriminant and the fields that kind needs. Records are
//! flat so hosts can round-trip partially filled forms; required fields are
//! enforced when the set is compiled into a [`Pipeline`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::evaluate::Pipeline;
use crate::types::{
    default_true, CaseMode, CounterScope, CounterStyle, EngineError, NamespaceMode, NodeId, Rule,
    DEFAULT_SEPARATOR,
};

/// Root rule-set configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSetConfig {
    /// Namespace separator; defaults to `.`.
    pub separator: Option<char>,

    /// Ordered rule records, applied first to last.
    pub rules: Vec<RuleRecord>,
}

impl RuleSetConfig {
    /// Parse a rule set from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a rule set from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The effective namespace separator.
    #[must_use]
    pub fn separator(&self) -> char {
        self.separator.unwrap_or(DEFAULT_SEPARATOR)
    }

    /// Validate every record and compile the set into a runnable pipeline.
    pub fn compile(&self) -> Result<Pipeline, EngineError> {
        let rules = self
            .rules
            .iter()
            .map(RuleRecord::to_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Pipeline::with_separator(rules, self.separator())
    }
}

/// One flat rule record; `kind` decides which fields are read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Rule discriminant.
    pub kind: RuleKind,

    /// Search text or pattern (replace).
    #[serde(default)]
    pub pattern: Option<String>,

    /// Replacement text (replace); defaults to empty.
    #[serde(default)]
    pub replacement: Option<String>,

    /// Interpret `pattern` as a regular expression (replace).
    #[serde(default)]
    pub use_regex: bool,

    /// Case-sensitive matching (replace).
    #[serde(default = "default_true")]
    pub match_case: bool,

    /// Text prepended to the candidate (prefix_suffix).
    #[serde(default)]
    pub prefix: Option<String>,

    /// Text appended to the candidate (prefix_suffix).
    #[serde(default)]
    pub suffix: Option<String>,

    /// First counter value (renumber).
    #[serde(default)]
    pub start: Option<u32>,

    /// Counter increment (renumber); defaults to 1.
    #[serde(default)]
    pub step: Option<i32>,

    /// Minimum digit count (renumber); defaults to 0.
    #[serde(default)]
    pub padding: Option<u32>,

    /// Counter sharing (renumber).
    #[serde(default)]
    pub scope: CounterScope,

    /// Counter rendering (renumber).
    #[serde(default)]
    pub style: CounterStyle,

    /// Namespace edit mode (namespace).
    #[serde(default)]
    pub mode: Option<NamespaceMode>,

    /// Namespace value (namespace).
    #[serde(default)]
    pub value: Option<String>,

    /// Node id → explicit name map (manual). TOML keys are strings;
    /// they must parse as node ids.
    #[serde(default)]
    pub overrides: Option<BTreeMap<String, String>>,

    /// Case fold mode (case).
    #[serde(default)]
    pub case: Option<CaseMode>,

    /// Characters dropped from the front (strip).
    #[serde(default)]
    pub from_start: Option<usize>,

    /// Characters dropped from the end (strip).
    #[serde(default)]
    pub from_end: Option<usize>,
}

impl RuleRecord {
    fn missing(&self, field: &str) -> EngineError {
        EngineError::MissingField {
            kind: self.kind.to_string(),
            field: field.to_string(),
        }
    }

    /// Convert the record into a typed rule, enforcing required fields.
    pub fn to_rule(&self) -> Result<Rule, EngineError> {
        Ok(match self.kind {
            RuleKind::Replace => Rule::Replace {
                pattern: self.pattern.clone().ok_or_else(|| self.missing("pattern"))?,
                replacement: self.replacement.clone().unwrap_or_default(),
                use_regex: self.use_regex,
                match_case: self.match_case,
            },
            RuleKind::PrefixSuffix => Rule::PrefixSuffix {
                prefix: self.prefix.clone(),
                suffix: self.suffix.clone(),
            },
            RuleKind::Renumber => Rule::Renumber {
                start: self.start.ok_or_else(|| self.missing("start"))?,
                step: self.step.unwrap_or(1),
                padding: self.padding.unwrap_or(0),
                scope: self.scope,
                style: self.style,
            },
            RuleKind::Namespace => {
                let mode = self.mode.ok_or_else(|| self.missing("mode"))?;
                let value = match mode {
                    NamespaceMode::Set | NamespaceMode::Add => {
                        self.value.clone().ok_or_else(|| self.missing("value"))?
                    }
                    NamespaceMode::Remove => self.value.clone().unwrap_or_default(),
                };
                Rule::Namespace { mode, value }
            }
            RuleKind::Manual => {
                let raw = self
                    .overrides
                    .as_ref()
                    .ok_or_else(|| self.missing("overrides"))?;
                let mut overrides = BTreeMap::new();
                for (key, name) in raw {
                    let id: u64 = key.parse().map_err(|_| EngineError::InvalidNodeId {
                        value: key.clone(),
                    })?;
                    overrides.insert(NodeId(id), name.clone());
                }
                Rule::Manual { overrides }
            }
            RuleKind::Case => Rule::Case {
                mode: self.case.ok_or_else(|| self.missing("case"))?,
            },
            RuleKind::Strip => Rule::Strip {
                from_start: self.from_start.unwrap_or(0),
                from_end: self.from_end.unwrap_or(0),
            },
        })
    }
}

/// Rule discriminant for flat records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Replace,
    PrefixSuffix,
    Renumber,
    Namespace,
    Manual,
    Case,
    Strip,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Replace => write!(f, "replace"),
            RuleKind::PrefixSuffix => write!(f, "prefix_suffix"),
            RuleKind::Renumber => write!(f, "renumber"),
            RuleKind::Namespace => write!(f, "namespace"),
            RuleKind::Manual => write!(f, "manual"),
            RuleKind::Case => write!(f, "case"),
            RuleKind::Strip => write!(f, "strip"),
        }
    }
}
