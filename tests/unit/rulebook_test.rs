//! Tests for rulebook loading and planning

use shipcheck::ShipcheckError;
use shipcheck::core::models::{Predicate, Stack};
use shipcheck::rulebook::Rulebook;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_builtin_chain_order() {
    let rulebook = Rulebook::builtin();
    let names: Vec<&str> = rulebook.steps.iter().map(|s| s.name.as_str()).collect();

    assert_eq!(
        names,
        vec!["git-setup", "ci", "container", "tests", "pre-commit", "governance", "ai-rules"]
    );
    assert_eq!(rulebook.prerequisite("git-setup"), None);
    assert_eq!(rulebook.prerequisite("container"), Some("ci"));
}

#[test]
fn test_builtin_plans_resolve_for_every_stack() {
    let rulebook = Rulebook::builtin();

    for stack in [Stack::Python, Stack::Node, Stack::Rust, Stack::Go, Stack::Unknown] {
        for step in &rulebook.steps {
            let plan = rulebook.plan(&step.name, stack).unwrap();
            assert!(!plan.checks.is_empty());
            assert_eq!(plan.checks.iter().filter(|c| c.predicate.is_gate()).count(), usize::from(plan.gate.is_some()));
        }
    }
}

#[test]
fn test_stack_specific_checks() {
    let rulebook = Rulebook::builtin();

    let python = rulebook.plan("tests", Stack::Python).unwrap();
    let go = rulebook.plan("tests", Stack::Go).unwrap();

    assert_eq!(python.checks.len(), go.checks.len() + 1);
    assert!(python.checks.iter().any(|c| matches!(c.predicate, Predicate::TomlKey { .. })));
    assert!(!go.checks.iter().any(|c| matches!(c.predicate, Predicate::JsonKey { .. })));
}

#[test]
fn test_hosted_steps() {
    let rulebook = Rulebook::builtin();

    assert!(!rulebook.plan("git-setup", Stack::Unknown).unwrap().needs_hosted());
    assert!(rulebook.plan("ci", Stack::Unknown).unwrap().needs_hosted());
    assert!(rulebook.plan("ai-rules", Stack::Unknown).unwrap().needs_hosted());
}

#[test]
fn test_load_custom_rulebook() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".shipcheck.toml"),
        r#"
[settings]
proof_dir = "build/proofs"
history_depth = 5

[[step]]
name = "license"

[[step.check]]
description = "License present"
kind = "any_file_exists"
paths = ["LICENSE", "LICENSE.md"]
"#,
    )
    .unwrap();

    let rulebook = Rulebook::load(temp.path()).unwrap();

    assert_eq!(rulebook.settings.proof_dir, "build/proofs");
    assert_eq!(rulebook.settings.history_depth, 5);
    assert_eq!(rulebook.settings.fallback_branch, "main");
    assert_eq!(rulebook.steps[0].checks.len(), 1);
}

#[test]
fn test_duplicate_step_names_rejected() {
    let temp = TempDir::new().unwrap();
    let step = "[[step]]\nname = \"ci\"\n[[step.check]]\ndescription = \"x\"\nkind = \"file_exists\"\npath = \"x\"\n";
    fs::write(temp.path().join(".shipcheck.toml"), format!("{step}{step}")).unwrap();

    let err = Rulebook::load(temp.path()).unwrap_err();

    assert!(matches!(err, ShipcheckError::InvalidRulebook { .. }));
    assert!(err.to_string().contains("defined more than once"));
}
