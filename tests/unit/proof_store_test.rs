//! Tests for proof storage through the public API

use shipcheck::ShipcheckError;
use shipcheck::core::models::Revision;
use shipcheck::storage::{ProofState, ProofStore};
use std::fs;
use tempfile::TempDir;

fn rev(short: &str) -> Revision {
    Revision::new(format!("{short:0<40}"), short)
}

fn store() -> (TempDir, ProofStore) {
    let temp = TempDir::new().unwrap();
    let store = ProofStore::new(temp.path().join(".shipcheck/proofs"));
    (temp, store)
}

#[test]
fn test_proof_lifecycle() {
    let (_temp, store) = store();

    let proof = store.write("ci", 4, 4, &rev("abc1234")).unwrap();
    assert_eq!(proof.ratio, "4/4");
    assert!(store.path_for("ci").ends_with("verify-ci.proof"));
    assert!(store.dir().join(".gitignore").exists());

    match store.check_stale("ci", &rev("abc1234")).unwrap() {
        ProofState::Current(current) => assert_eq!(current, proof),
        other => panic!("expected current proof, got {other:?}"),
    }

    assert_eq!(
        store.check_stale("ci", &rev("def5678")).unwrap(),
        ProofState::Stale {
            stored: "abc1234".to_string()
        }
    );
    assert!(!store.exists("ci"));
    assert_eq!(store.check_stale("ci", &rev("def5678")).unwrap(), ProofState::Missing);
}

#[test]
fn test_incomplete_run_cannot_write_proof() {
    let (_temp, store) = store();

    let err = store.write("ci", 3, 4, &rev("abc1234")).unwrap_err();

    assert!(matches!(err, ShipcheckError::IncompleteProof { passed: 3, total: 4, .. }));
    assert!(!store.exists("ci"));
}

#[test]
fn test_corrupt_proof_is_discarded() {
    let (_temp, store) = store();
    store.ensure_dir().unwrap();
    fs::write(store.path_for("tests"), "not json").unwrap();

    let state = store.check_stale("tests", &rev("abc1234")).unwrap();

    assert!(!state.is_current());
    assert!(!store.exists("tests"));
}

#[test]
fn test_list_and_clear() {
    let (_temp, store) = store();
    store.write("ci", 1, 1, &rev("abc1234")).unwrap();
    store.write("git-setup", 2, 2, &rev("abc1234")).unwrap();

    let mut steps = store.list().unwrap();
    steps.sort();
    assert_eq!(steps, vec!["ci", "git-setup"]);

    assert_eq!(store.clear().unwrap(), 2);
    assert!(store.list().unwrap().is_empty());
    assert!(store.dir().join(".gitignore").exists());
}
