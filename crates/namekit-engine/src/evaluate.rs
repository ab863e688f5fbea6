//! Pipeline construction and rule evaluation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::{NoExpand, Regex, RegexBuilder};

use namekit_name::{alpha_tail, parse_segments, strip_numeric_tail};

use crate::resolve::resolve;
use crate::types::{
    CaseMode, CounterScope, CounterStyle, EngineError, InvalidReason, NameToken, NamespaceMode,
    NodeId, RenamePlan, Rule, DEFAULT_SEPARATOR,
};

/// An ordered, validated rule list ready to run.
///
/// Construction compiles every pattern and rejects malformed rules up front,
/// so evaluation itself cannot fail per-rule. A pipeline holds no state
/// between runs; counters live in the run, not here.
#[derive(Debug)]
pub struct Pipeline {
    rules: Vec<CompiledRule>,
    separator: char,
}

#[derive(Debug)]
enum CompiledRule {
    Replace(ReplaceOp),
    PrefixSuffix {
        prefix: Option<String>,
        suffix: Option<String>,
    },
    Renumber {
        start: u32,
        step: i32,
        padding: u32,
        scope: CounterScope,
        style: CounterStyle,
    },
    Namespace {
        mode: NamespaceMode,
        segments: Vec<String>,
    },
    Manual(BTreeMap<NodeId, String>),
    Case(CaseMode),
    Strip {
        from_start: usize,
        from_end: usize,
    },
}

#[derive(Debug)]
enum ReplaceOp {
    /// Empty pattern: the rule is a no-op.
    Noop,
    /// Case-sensitive literal, replace-all left to right.
    Literal { pattern: String, replacement: String },
    /// Compiled regex; `verbatim` suppresses capture-group expansion
    /// (used for case-insensitive literal matching).
    Pattern {
        regex: Regex,
        replacement: String,
        verbatim: bool,
    },
}

impl ReplaceOp {
    fn compile(
        pattern: &str,
        replacement: &str,
        use_regex: bool,
        match_case: bool,
    ) -> Result<Self, EngineError> {
        if pattern.is_empty() {
            return Ok(ReplaceOp::Noop);
        }
        if !use_regex && match_case {
            return Ok(ReplaceOp::Literal {
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
            });
        }

        let expr = if use_regex {
            pattern.to_string()
        } else {
            regex::escape(pattern)
        };
        let regex = RegexBuilder::new(&expr)
            .case_insensitive(!match_case)
            .build()
            .map_err(|source| EngineError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(ReplaceOp::Pattern {
            regex,
            replacement: replacement.to_string(),
            verbatim: !use_regex,
        })
    }

    fn apply(&self, input: &str) -> String {
        match self {
            ReplaceOp::Noop => input.to_string(),
            ReplaceOp::Literal {
                pattern,
                replacement,
            } => input.replace(pattern.as_str(), replacement),
            ReplaceOp::Pattern {
                regex,
                replacement,
                verbatim,
            } => {
                if *verbatim {
                    regex.replace_all(input, NoExpand(replacement)).into_owned()
                } else {
                    regex.replace_all(input, replacement.as_str()).into_owned()
                }
            }
        }
    }
}

/// A node's evolving name during one pipeline pass.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub namespace: Vec<String>,
    pub short_name: String,
    /// Set by a manual override; no later rule touches the node.
    locked: bool,
    /// First evaluation-time defect, sticky until resolution.
    pub invalid: Option<InvalidReason>,
}

/// Invocation-scoped counter state, one slot per rule position.
struct RunState {
    counters: Vec<CounterSlot>,
}

#[derive(Default)]
struct CounterSlot {
    next: u64,
    per_base: HashMap<String, u64>,
}

impl RunState {
    fn new(rule_count: usize) -> Self {
        Self {
            counters: (0..rule_count).map(|_| CounterSlot::default()).collect(),
        }
    }
}

impl Pipeline {
    /// Build a pipeline with the default `.` separator.
    pub fn new(rules: Vec<Rule>) -> Result<Self, EngineError> {
        Self::with_separator(rules, DEFAULT_SEPARATOR)
    }

    /// Build a pipeline with an explicit namespace separator.
    ///
    /// Fails fast on malformed rules: an unparsable pattern, a zero renumber
    /// step, or a manual name containing the separator. No node is ever
    /// evaluated against a partially valid rule list.
    pub fn with_separator(rules: Vec<Rule>, separator: char) -> Result<Self, EngineError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            compiled.push(Self::compile_rule(rule, separator)?);
        }
        Ok(Self {
            rules: compiled,
            separator,
        })
    }

    /// The configured namespace separator.
    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Number of rules in the pipeline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the pipeline holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn compile_rule(rule: Rule, separator: char) -> Result<CompiledRule, EngineError> {
        Ok(match rule {
            Rule::Replace {
                pattern,
                replacement,
                use_regex,
                match_case,
            } => CompiledRule::Replace(ReplaceOp::compile(
                &pattern,
                &replacement,
                use_regex,
                match_case,
            )?),
            Rule::PrefixSuffix { prefix, suffix } => CompiledRule::PrefixSuffix { prefix, suffix },
            Rule::Renumber {
                start,
                step,
                padding,
                scope,
                style,
            } => {
                if step == 0 {
                    return Err(EngineError::ZeroStep);
                }
                CompiledRule::Renumber {
                    start,
                    step,
                    padding,
                    scope,
                    style,
                }
            }
            Rule::Namespace { mode, value } => CompiledRule::Namespace {
                mode,
                segments: parse_segments(&value, separator),
            },
            Rule::Manual { overrides } => {
                for name in overrides.values() {
                    if name.contains(separator) {
                        return Err(EngineError::SeparatorInName { name: name.clone() });
                    }
                }
                CompiledRule::Manual(overrides)
            }
            Rule::Case { mode } => CompiledRule::Case(mode),
            Rule::Strip {
                from_start,
                from_end,
            } => CompiledRule::Strip {
                from_start,
                from_end,
            },
        })
    }

    /// Run the pipeline over a node snapshot and resolve the outcome.
    ///
    /// Pure: the same `(nodes, rules, existing)` always produce the same
    /// plan. Duplicate node ids violate the token invariant and abort the
    /// run before any evaluation; per-node problems never abort, they are
    /// collected into the plan.
    pub fn run(
        &self,
        nodes: &[NameToken],
        existing: &BTreeSet<String>,
    ) -> Result<RenamePlan, EngineError> {
        let mut seen = BTreeSet::new();
        for token in nodes {
            if !seen.insert(token.id) {
                return Err(EngineError::DuplicateNodeId(token.id));
            }
        }

        let candidates = self.evaluate(nodes);
        Ok(resolve(nodes, &candidates, existing, self.separator))
    }

    /// Evaluate every node through the full rule sequence, in caller order.
    ///
    /// Counters reset here, at the start of the run, and are shared across
    /// all nodes of the run; this is why traversal order is part of the
    /// contract and must not be reordered.
    pub(crate) fn evaluate(&self, nodes: &[NameToken]) -> Vec<Candidate> {
        let mut state = RunState::new(self.rules.len());
        nodes
            .iter()
            .map(|token| self.evaluate_node(token, &mut state))
            .collect()
    }

    fn evaluate_node(&self, token: &NameToken, state: &mut RunState) -> Candidate {
        let mut candidate = Candidate {
            namespace: token.namespace.clone(),
            short_name: token.short_name.clone(),
            locked: false,
            invalid: None,
        };

        for (position, rule) in self.rules.iter().enumerate() {
            if candidate.locked {
                break;
            }
            match rule {
                CompiledRule::Replace(op) => {
                    candidate.short_name = op.apply(&candidate.short_name);
                }
                CompiledRule::PrefixSuffix { prefix, suffix } => {
                    let mut name = String::new();
                    if let Some(prefix) = prefix {
                        name.push_str(prefix);
                    }
                    name.push_str(&candidate.short_name);
                    if let Some(suffix) = suffix {
                        name.push_str(suffix);
                    }
                    candidate.short_name = name;
                }
                CompiledRule::Renumber {
                    start,
                    step,
                    padding,
                    scope,
                    style,
                } => {
                    let base = strip_numeric_tail(&candidate.short_name).to_string();
                    let slot = &mut state.counters[position];
                    let index = match scope {
                        CounterScope::PerNode => {
                            let index = slot.next;
                            slot.next += 1;
                            index
                        }
                        CounterScope::PerBase => {
                            let counter = slot.per_base.entry(base.clone()).or_insert(0);
                            let index = *counter;
                            *counter += 1;
                            index
                        }
                    };
                    let value = i64::from(*start) + i64::from(*step) * index as i64;
                    if value < 0 {
                        if candidate.invalid.is_none() {
                            candidate.invalid = Some(InvalidReason::NegativeCounter);
                        }
                        continue;
                    }
                    candidate.short_name = match style {
                        CounterStyle::Digits => {
                            format!("{base}{value:0width$}", width = *padding as usize)
                        }
                        CounterStyle::Letters => {
                            format!("{base}_{}", alpha_tail(value as u64, false))
                        }
                        CounterStyle::UpperLetters => {
                            format!("{base}_{}", alpha_tail(value as u64, true))
                        }
                    };
                }
                CompiledRule::Namespace { mode, segments } => match mode {
                    NamespaceMode::Set => {
                        candidate.namespace = segments.clone();
                    }
                    NamespaceMode::Add => {
                        candidate.namespace.extend(segments.iter().cloned());
                    }
                    NamespaceMode::Remove => {
                        if let Some(target) = segments.first() {
                            if let Some(found) =
                                candidate.namespace.iter().rposition(|s| s == target)
                            {
                                candidate.namespace.remove(found);
                            }
                        } else {
                            candidate.namespace.pop();
                        }
                    }
                },
                CompiledRule::Manual(overrides) => {
                    if let Some(name) = overrides.get(&token.id) {
                        candidate.short_name = name.clone();
                        candidate.locked = true;
                    }
                }
                CompiledRule::Case(mode) => {
                    candidate.short_name = match mode {
                        CaseMode::Upper => candidate.short_name.to_uppercase(),
                        CaseMode::Lower => candidate.short_name.to_lowercase(),
                    };
                }
                CompiledRule::Strip {
                    from_start,
                    from_end,
                } => {
                    let chars: Vec<char> = candidate.short_name.chars().collect();
                    candidate.short_name = if from_start + from_end >= chars.len() {
                        String::new()
                    } else {
                        chars[*from_start..chars.len() - from_end].iter().collect()
                    };
                }
            }
        }

        candidate
    }
}
