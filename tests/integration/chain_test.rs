//! Integration tests for step chaining
//!
//! Tests the dependency gate:
//! 1. A step without a current predecessor proof fails its first check
//! 2. The other checks still run and are reported
//! 3. A new commit turns every proof stale

use super::{commit_all, init_git_repo, proof_path, read_proof, shipcheck, short_head};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LOCAL_CHAIN: &str = r#"
[[step]]
name = "readme"

[[step.check]]
description = "README present"
kind = "file_exists"
path = "README.md"

[[step]]
name = "docs"

[[step.check]]
description = "Docs directory present"
kind = "dir_exists"
path = "docs"

[[step]]
name = "license"
requires = "readme"

[[step.check]]
description = "License present"
kind = "file_exists"
path = "LICENSE"
"#;

fn setup_chain() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    init_git_repo(root);
    fs::write(root.join(".shipcheck.toml"), LOCAL_CHAIN).unwrap();
    fs::write(root.join("README.md"), "# widget\n").unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("docs/index.md"), "docs\n").unwrap();
    fs::write(root.join("LICENSE"), "MIT\n").unwrap();
    commit_all(root, "Initial commit");
    temp
}

fn verify(root: &Path, step: &str) -> assert_cmd::assert::Assert {
    shipcheck().args(["verify", step]).current_dir(root).assert()
}

#[test]
fn test_gate_fails_without_predecessor_proof() {
    let temp = setup_chain();

    verify(temp.path(), "docs")
        .code(1)
        .stdout(predicate::str::contains("Step 'readme' verified at the current revision"))
        .stdout(predicate::str::contains("step 'readme' has not been verified"))
        .stdout(predicate::str::contains("1/2 passed, 1 failed"));

    assert!(!proof_path(temp.path(), "docs").exists());
}

#[test]
fn test_chain_in_order_passes() {
    let temp = setup_chain();

    verify(temp.path(), "readme").success();
    verify(temp.path(), "docs").success().stdout(predicate::str::contains("2/2 passed"));

    assert_eq!(read_proof(temp.path(), "docs")["ratio"], "2/2");
}

#[test]
fn test_explicit_requires_skips_previous_step() {
    let temp = setup_chain();

    verify(temp.path(), "readme").success();

    verify(temp.path(), "license").success();
}

#[test]
fn test_new_commit_makes_predecessor_stale() {
    let temp = setup_chain();
    verify(temp.path(), "readme").success();
    let verified_at = short_head(temp.path());

    fs::write(temp.path().join("CHANGELOG.md"), "- handshake\n").unwrap();
    commit_all(temp.path(), "chore: handshake");
    assert_ne!(short_head(temp.path()), verified_at);

    verify(temp.path(), "docs")
        .code(1)
        .stdout(predicate::str::contains(format!("issued at {verified_at}")));
    assert!(!proof_path(temp.path(), "readme").exists());

    verify(temp.path(), "readme").success();
    verify(temp.path(), "docs").success();
}

#[test]
fn test_stale_own_proof_reported() {
    let temp = setup_chain();
    verify(temp.path(), "readme").success();
    commit_all(temp.path(), "chore: empty");

    verify(temp.path(), "readme")
        .success()
        .stdout(predicate::str::contains("Previous proof was stale"));

    let proof = read_proof(temp.path(), "readme");
    assert_eq!(proof["revision"], short_head(temp.path()).as_str());
}
