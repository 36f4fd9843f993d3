//! Integration tests for hosted repository checks
//!
//! A fake `gh` script on `PATH` stands in for GitHub. Each test writes
//! the script, runs the binary, and inspects the outcome and the calls
//! the script recorded.

use super::{proof_path, read_proof, satisfy_basics, setup_repo, shipcheck};
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

const PROTECTION: &str = r#"{"enforce_admins":{"enabled":true},"required_status_checks":{"contexts":["test"]},"required_pull_request_reviews":{"required_approving_review_count":1}}"#;

const TEMPLATE: &str = r#"#!/bin/sh
echo "$*" >> "@LOG@"
case "$1" in
  --version) echo "gh version 2.63.0 (fake)" ;;
  repo) echo '{"defaultBranchRef":{"name":"main"}}' ;;
  run)
    if [ "$2" = "list" ]; then echo '@RUNS@'; else echo '{"jobs":[]}'; fi ;;
  api)
    if [ "$2" = "-X" ]; then echo '{}'; else echo '@PROTECTION@'; fi ;;
  pr)
    if [ "$2" = "merge" ]; then echo "merged"; else echo "no pull requests found for branch" >&2; exit 1; fi ;;
  *) echo "unsupported: $*" >&2; exit 1 ;;
esac
"#;

const UNREACHABLE: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then echo "gh version 2.63.0 (fake)"; exit 0; fi
echo "error connecting to api.github.com" >&2
exit 1
"#;

/// Fake `gh` installation: a bin directory and the call log
struct FakeGh {
    bin: TempDir,
}

impl FakeGh {
    fn with_runs(runs: &str) -> Self {
        let bin = TempDir::new().unwrap();
        let script = TEMPLATE
            .replace("@LOG@", &bin.path().join("calls.log").display().to_string())
            .replace("@RUNS@", runs)
            .replace("@PROTECTION@", PROTECTION);
        Self::install(bin, &script)
    }

    fn unreachable() -> Self {
        Self::install(TempDir::new().unwrap(), UNREACHABLE)
    }

    fn install(bin: TempDir, script: &str) -> Self {
        let path = bin.path().join("gh");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        Self { bin }
    }

    fn path_env(&self) -> String {
        format!("{}:{}", self.bin.path().display(), std::env::var("PATH").unwrap_or_default())
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.bin.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn run_json(status: &str, conclusion: &str) -> String {
    format!(
        r#"[{{"databaseId":101,"name":"push","workflowName":"CI","status":"{status}","conclusion":"{conclusion}","headBranch":"main"}}]"#
    )
}

/// Repository whose `basics` step is verified and whose workflow file exists
fn ready_for_ci() -> TempDir {
    let temp = setup_repo();
    satisfy_basics(temp.path());
    fs::create_dir_all(temp.path().join(".github/workflows")).unwrap();
    fs::write(temp.path().join(".github/workflows/ci.yml"), "name: CI\n").unwrap();
    shipcheck().args(["verify", "basics"]).current_dir(temp.path()).assert().success();
    temp
}

fn verify_ci(root: &Path, path: &str) -> assert_cmd::assert::Assert {
    shipcheck().args(["verify", "ci"]).env("PATH", path).current_dir(root).assert()
}

#[test]
#[serial]
fn test_green_ci_writes_proof() {
    let temp = ready_for_ci();
    let gh = FakeGh::with_runs(&run_json("completed", "success"));

    verify_ci(temp.path(), &gh.path_env())
        .success()
        .stdout(predicate::str::contains("3/3 passed"));

    assert_eq!(read_proof(temp.path(), "ci")["ratio"], "3/3");
    assert!(gh.calls().iter().any(|c| c.starts_with("run list --branch main")));
}

#[test]
#[serial]
fn test_running_ci_is_pending() {
    let temp = ready_for_ci();
    let gh = FakeGh::with_runs(&run_json("in_progress", ""));

    verify_ci(temp.path(), &gh.path_env())
        .code(1)
        .stdout(predicate::str::contains("PENDING"))
        .stdout(predicate::str::contains("2/3 passed, 0 failed, 1 pending"));

    assert!(!proof_path(temp.path(), "ci").exists());
}

#[test]
#[serial]
fn test_failed_ci_fails() {
    let temp = ready_for_ci();
    let gh = FakeGh::with_runs(&run_json("completed", "failure"));

    verify_ci(temp.path(), &gh.path_env())
        .code(1)
        .stdout(predicate::str::contains("'failure'"))
        .stdout(predicate::str::contains("1 failed, 0 pending"));
}

#[test]
#[serial]
fn test_no_runs_is_pending() {
    let temp = ready_for_ci();
    let gh = FakeGh::with_runs("[]");

    verify_ci(temp.path(), &gh.path_env())
        .code(1)
        .stdout(predicate::str::contains("1 pending"));
}

#[test]
#[serial]
fn test_unreachable_host_is_pending() {
    let temp = ready_for_ci();
    let gh = FakeGh::unreachable();

    verify_ci(temp.path(), &gh.path_env())
        .code(1)
        .stdout(predicate::str::contains("0 failed, 1 pending"));
}

#[test]
#[serial]
fn test_missing_gh_is_hard_error() {
    let temp = ready_for_ci();
    let empty = TempDir::new().unwrap();

    verify_ci(temp.path(), &empty.path().display().to_string())
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("required tool 'gh' was not found on PATH"));
}

#[test]
#[serial]
fn test_local_step_does_not_need_gh() {
    let temp = setup_repo();
    satisfy_basics(temp.path());
    let empty = TempDir::new().unwrap();

    shipcheck()
        .args(["verify", "basics"])
        .env("PATH", empty.path())
        .current_dir(temp.path())
        .assert()
        .success();
}

#[test]
#[serial]
fn test_merge_relaxes_and_restores_approvals() {
    let temp = setup_repo();
    let gh = FakeGh::with_runs("[]");

    shipcheck()
        .args(["merge", "42"])
        .env("PATH", gh.path_env())
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged pull request #42"));

    let mutations: Vec<String> = gh
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("api -X") || c.starts_with("pr merge"))
        .collect();
    assert_eq!(mutations.len(), 3);
    assert!(mutations[0].ends_with("required_approving_review_count=0"));
    assert_eq!(mutations[1], "pr merge 42 --squash");
    assert!(mutations[2].ends_with("required_approving_review_count=1"));
}
