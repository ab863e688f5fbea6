//! BDD-style scenario tests for end-to-end plan computation.

use std::collections::{BTreeMap, BTreeSet};

use namekit_engine::{
    ConflictKind, CounterScope, CounterStyle, NameToken, NodeId, Pipeline, PlanStatus, RenamePlan,
    Rule,
};

fn run(rules: Vec<Rule>, nodes: Vec<NameToken>, existing: &[&str]) -> RenamePlan {
    let existing: BTreeSet<String> = existing.iter().map(|s| s.to_string()).collect();
    Pipeline::new(rules).unwrap().run(&nodes, &existing).unwrap()
}

// ── replace ──────────────────────────────────────────────────────

mod replace_scenarios {
    use super::*;

    #[test]
    fn given_matching_and_non_matching_nodes_then_ok_and_unchanged() {
        let plan = run(
            vec![Rule::Replace {
                pattern: "arm".into(),
                replacement: "hand".into(),
                use_regex: false,
                match_case: true,
            }],
            vec![NameToken::new(1, "arm"), NameToken::new(2, "leg")],
            &[],
        );
        assert_eq!(plan.entries[0].status, PlanStatus::Ok);
        assert_eq!(plan.entries[0].new_path, "hand");
        assert_eq!(plan.entries[1].status, PlanStatus::Unchanged);
        assert_eq!(plan.entries[1].new_path, "leg");
    }

    #[test]
    fn given_replace_collapsing_two_names_then_both_conflict_mutually() {
        let plan = run(
            vec![Rule::Replace {
                pattern: "_old".into(),
                replacement: String::new(),
                use_regex: false,
                match_case: true,
            }],
            vec![NameToken::new(1, "a"), NameToken::new(2, "a_old")],
            &[],
        );
        assert_eq!(
            plan.entries[0].status,
            PlanStatus::Conflict {
                with: ConflictKind::WithNode(NodeId(2))
            }
        );
        assert_eq!(
            plan.entries[1].status,
            PlanStatus::Conflict {
                with: ConflictKind::WithNode(NodeId(1))
            }
        );
        assert_eq!(plan.conflicts, 2);
    }

    #[test]
    fn given_candidate_held_outside_the_batch_then_external_conflict() {
        let plan = run(
            vec![Rule::Replace {
                pattern: "bar".into(),
                replacement: "foo".into(),
                use_regex: false,
                match_case: true,
            }],
            vec![NameToken::with_namespace(1, ["root"], "bar")],
            &["root.foo"],
        );
        assert_eq!(
            plan.entries[0].status,
            PlanStatus::Conflict {
                with: ConflictKind::External
            }
        );
    }
}

// ── prefix/suffix ────────────────────────────────────────────────

mod prefix_suffix_scenarios {
    use super::*;

    #[test]
    fn given_distinct_names_then_prefixing_both_stays_conflict_free() {
        let plan = run(
            vec![Rule::PrefixSuffix {
                prefix: Some("x_".into()),
                suffix: None,
            }],
            vec![NameToken::new(1, "a"), NameToken::new(2, "b")],
            &[],
        );
        assert_eq!(plan.entries[0].new_path, "x_a");
        assert_eq!(plan.entries[1].new_path, "x_b");
        assert_eq!(plan.ok, 2);
        assert_eq!(plan.conflicts, 0);
    }

    #[test]
    fn given_prefix_applied_twice_then_no_deduplication() {
        let rule = Rule::PrefixSuffix {
            prefix: Some("L_".into()),
            suffix: None,
        };
        let plan = run(
            vec![rule.clone(), rule],
            vec![NameToken::new(1, "base")],
            &[],
        );
        assert_eq!(plan.entries[0].new_path, "L_L_base");
    }
}

// ── renumber ─────────────────────────────────────────────────────

mod renumber_scenarios {
    use super::*;

    #[test]
    fn given_three_identically_named_nodes_then_traversal_order_numbering() {
        let plan = run(
            vec![Rule::Renumber {
                start: 1,
                step: 1,
                padding: 2,
                scope: CounterScope::PerNode,
                style: CounterStyle::Digits,
            }],
            vec![
                NameToken::new(1, "obj"),
                NameToken::new(2, "obj"),
                NameToken::new(3, "obj"),
            ],
            &[],
        );
        let names: Vec<&str> = plan.entries.iter().map(|e| e.new_path.as_str()).collect();
        assert_eq!(names, vec!["obj01", "obj02", "obj03"]);
        assert_eq!(plan.ok, 3);
        assert_eq!(plan.conflicts, 0);
    }

    #[test]
    fn given_same_inputs_twice_then_counters_reset_between_runs() {
        let pipeline = Pipeline::new(vec![Rule::Renumber {
            start: 1,
            step: 1,
            padding: 2,
            scope: CounterScope::PerNode,
            style: CounterStyle::Digits,
        }])
        .unwrap();
        let nodes = vec![NameToken::new(1, "obj"), NameToken::new(2, "obj")];
        let first = pipeline.run(&nodes, &BTreeSet::new()).unwrap();
        let second = pipeline.run(&nodes, &BTreeSet::new()).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.entries[0].new_path, "obj01");
    }
}

// ── namespace ────────────────────────────────────────────────────

mod namespace_scenarios {
    use super::*;

    #[test]
    fn given_namespace_move_then_full_path_reflects_it() {
        let plan = run(
            vec![Rule::Namespace {
                mode: namekit_engine::NamespaceMode::Set,
                value: "props.kitchen".into(),
            }],
            vec![NameToken::with_namespace(1, ["root"], "mug")],
            &[],
        );
        assert_eq!(plan.entries[0].old_path, "root.mug");
        assert_eq!(plan.entries[0].new_path, "props.kitchen.mug");
        assert_eq!(plan.entries[0].status, PlanStatus::Ok);
    }

    #[test]
    fn given_remove_of_absent_namespace_then_unchanged_not_error() {
        let plan = run(
            vec![Rule::Namespace {
                mode: namekit_engine::NamespaceMode::Remove,
                value: "anim".into(),
            }],
            vec![NameToken::new(1, "mug")],
            &[],
        );
        assert_eq!(plan.entries[0].status, PlanStatus::Unchanged);
    }
}

// ── manual ───────────────────────────────────────────────────────

mod manual_scenarios {
    use super::*;

    #[test]
    fn given_manual_override_then_other_rules_are_bypassed_for_that_node() {
        let plan = run(
            vec![
                Rule::Manual {
                    overrides: BTreeMap::from([(NodeId(1), "hero_grp".to_string())]),
                },
                Rule::PrefixSuffix {
                    prefix: Some("x_".into()),
                    suffix: None,
                },
            ],
            vec![NameToken::new(1, "thing"), NameToken::new(2, "other")],
            &[],
        );
        assert_eq!(plan.entries[0].new_path, "hero_grp");
        assert_eq!(plan.entries[1].new_path, "x_other");
    }

    #[test]
    fn given_manual_names_then_they_still_feed_conflict_resolution() {
        let plan = run(
            vec![Rule::Manual {
                overrides: BTreeMap::from([
                    (NodeId(1), "same".to_string()),
                    (NodeId(2), "same".to_string()),
                ]),
            }],
            vec![NameToken::new(1, "a"), NameToken::new(2, "b")],
            &[],
        );
        assert_eq!(plan.conflicts, 2);
    }
}

// ── validity ─────────────────────────────────────────────────────

mod validity_scenarios {
    use super::*;

    #[test]
    fn given_rule_emptying_a_name_then_invalid_and_excluded_from_grouping() {
        // Node 1 is emptied; node 2 keeps "a". The invalid entry must not
        // collide with anything, and node 2 stays unchanged.
        let plan = run(
            vec![Rule::Replace {
                pattern: "a".into(),
                replacement: String::new(),
                use_regex: false,
                match_case: true,
            }],
            vec![NameToken::new(1, "aa"), NameToken::new(2, "b")],
            &[],
        );
        assert!(matches!(
            plan.entries[0].status,
            PlanStatus::Invalid { .. }
        ));
        assert_eq!(plan.entries[1].status, PlanStatus::Unchanged);
        assert_eq!(plan.invalid, 1);
        assert_eq!(plan.conflicts, 0);
    }

    #[test]
    fn given_invalid_candidate_matching_anothers_target_then_no_absorbed_conflict() {
        // Node 1 renames to "x9"; node 2 strips to all digits and is invalid.
        // The invalid candidate never consumes "x9"-adjacent names.
        let plan = run(
            vec![Rule::Strip {
                from_start: 1,
                from_end: 0,
            }],
            vec![NameToken::new(1, "xx9"), NameToken::new(2, "x9")],
            &[],
        );
        assert_eq!(plan.entries[0].new_path, "x9");
        assert_eq!(plan.entries[0].status, PlanStatus::Ok);
        assert!(matches!(
            plan.entries[1].status,
            PlanStatus::Invalid { .. }
        ));
    }
}
